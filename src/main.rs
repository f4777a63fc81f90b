fn main() {
    curriculum_map::cli::run();
}
