use std::collections::{HashMap, HashSet};
use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::resolve::{resolve_config_with_override, ResolvedConfig};
use crate::core::course::CourseCode;
use crate::core::curriculum::{Curriculum, Selection};
use crate::error::{CurriculumError, Result};
use crate::graph::check::{check_curriculum, CheckReport};
use crate::graph::layout::semester_grid;
use crate::graph::ops::{sorted_codes, trace_scope, TraceScope};
use crate::graph::project::{EdgePolicy, NodeClass};
use crate::graph::viz;
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "curriculum-map")]
#[command(about = "Curriculum prerequisite map", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub table: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Courses(CoursesArgs),
    Trace(TraceArgs),
    Show(ShowArgs),
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct CoursesArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TraceArgs {
    pub course: String,
    #[arg(long, default_value = "down")]
    pub direction: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub course: String,
    #[arg(long)]
    pub policy: Option<String>,
    #[arg(long)]
    pub scope: Option<String>,
    #[arg(long, default_value = "dot")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long)]
    pub json: bool,
}

pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("curriculum_map={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(cli: Cli) -> Result<()> {
    let (resolved, curriculum) = load_curriculum(cli.config, cli.table)?;
    match cli.command {
        Commands::Courses(args) => handle_courses(args, &curriculum),
        Commands::Trace(args) => handle_trace(args, &curriculum),
        Commands::Show(args) => handle_show(args, &resolved, &curriculum),
        Commands::Check(args) => handle_check(args, &curriculum),
    }
}

fn load_curriculum(
    config_path: Option<PathBuf>,
    table: Option<PathBuf>,
) -> Result<(ResolvedConfig, Curriculum)> {
    let cwd = env::current_dir()?;
    let resolved = resolve_config_with_override(cwd, config_path)?;
    match &resolved.config_path {
        Some(path) => tracing::info!(path = %path.display(), "using config"),
        None => tracing::info!("no config file found, using defaults"),
    }
    let table_path = resolved.table_path(table)?;
    let curriculum = Curriculum::load(&table_path, &resolved.settings.table)?;
    Ok((resolved, curriculum))
}

fn handle_courses(args: CoursesArgs, curriculum: &Curriculum) -> Result<()> {
    if args.json {
        let courses: Vec<CourseJson> = curriculum
            .records()
            .iter()
            .map(|record| CourseJson {
                code: record.code.to_string(),
                title: record.title.clone(),
                semester: record.semester,
                prerequisites: record.prerequisites.clone(),
                corequisites: record.corequisites.clone(),
            })
            .collect();
        println!("{}", to_json(&courses)?);
        return Ok(());
    }

    for course in curriculum.graph().courses() {
        println!("{}\t{}\t{}", course.semester, course.code, course.title);
    }
    Ok(())
}

fn handle_trace(args: TraceArgs, curriculum: &Curriculum) -> Result<()> {
    let scope: TraceScope = args.direction.parse()?;
    let reachable = trace_scope(curriculum.graph(), &args.course, scope)?;
    let codes: Vec<String> = sorted_codes(&reachable)
        .into_iter()
        .map(|code| code.to_string())
        .collect();

    if args.json {
        println!("{}", to_json(&codes)?);
        return Ok(());
    }

    println!("{} of {}:", scope.as_str(), args.course);
    for code in codes {
        println!("{}", code);
    }
    Ok(())
}

fn handle_show(args: ShowArgs, resolved: &ResolvedConfig, curriculum: &Curriculum) -> Result<()> {
    let display_config = &resolved.settings.display;
    let policy: EdgePolicy = match args.policy.as_ref().or(display_config.policy.as_ref()) {
        Some(name) => name.parse()?,
        None => EdgePolicy::default(),
    };
    let scope: Option<TraceScope> = args
        .scope
        .as_ref()
        .or(display_config.scope.as_ref())
        .map(|name| name.parse())
        .transpose()?;

    let selection = curriculum.select(&args.course, policy, scope)?;
    let labels = course_labels(curriculum);
    let caption = viz::caption(&selection.start, selection.scope);

    match args.format.to_ascii_lowercase().as_str() {
        "dot" => {
            let positions = semester_grid(curriculum.graph(), &resolved.settings.layout);
            print!(
                "{}",
                viz::render_dot(&selection.display, &labels, &positions, &caption)
            );
            Ok(())
        }
        "tree" => {
            let (roots, edges) = selection_tree(&selection);
            print!("{}", viz::render_tree(&roots, &edges, &labels));
            Ok(())
        }
        "flat" => {
            let (roots, edges) = selection_tree(&selection);
            print!("{}", viz::render_flat(&roots, &edges, &labels));
            Ok(())
        }
        "json" => {
            let json = selection_to_json(&selection, curriculum, resolved, caption);
            println!("{}", to_json(&json)?);
            Ok(())
        }
        other => Err(CurriculumError::Other(anyhow::anyhow!(format!(
            "unknown show format '{}'",
            other
        )))),
    }
}

fn handle_check(args: CheckArgs, curriculum: &Curriculum) -> Result<()> {
    let report = check_curriculum(curriculum.graph(), curriculum.records());

    if args.json {
        println!("{}", to_json(&CheckJson::from(&report))?);
    } else {
        print_check_report(&report);
    }
    if !report.unresolved.is_empty() {
        output::warn(&format!(
            "{} unresolved reference(s) ignored",
            report.unresolved.len()
        ));
    }

    if report.has_failures() {
        return Err(CurriculumError::Other(anyhow::anyhow!(format!(
            "curriculum check failed: {} cycle(s), {} semester violation(s)",
            report.cycles.len(),
            report.violations.len()
        ))));
    }
    Ok(())
}

fn print_check_report(report: &CheckReport) {
    if report.cycles.is_empty() && report.violations.is_empty() && report.unresolved.is_empty() {
        output::info("no curriculum issues found");
        return;
    }

    if !report.cycles.is_empty() {
        println!("cycles:");
        for cycle in &report.cycles {
            let line = cycle
                .iter()
                .map(|code| code.as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            println!("  {}", line);
        }
    }

    if !report.violations.is_empty() {
        println!("semester order violations:");
        for violation in &report.violations {
            println!(
                "  {} (semester {}) -> {} (semester {}) [{}]",
                violation.requirement,
                violation.requirement_semester,
                violation.course,
                violation.course_semester,
                violation.kind.as_str()
            );
        }
    }

    if !report.unresolved.is_empty() {
        println!("unresolved references (ignored):");
        for unresolved in &report.unresolved {
            println!(
                "  {} -> {} [{}]",
                unresolved.course,
                unresolved.reference,
                unresolved.kind.as_str()
            );
        }
    }
}

fn course_labels(curriculum: &Curriculum) -> HashMap<CourseCode, String> {
    curriculum
        .graph()
        .courses()
        .map(|course| {
            let label = if course.title.is_empty() {
                course.code.to_string()
            } else {
                format!("{} ({})", course.code, course.title)
            };
            (course.code.clone(), label)
        })
        .collect()
}

/// Roots and adjacency of the displayed edges among the selected and
/// connected courses.
fn selection_tree(
    selection: &Selection,
) -> (Vec<CourseCode>, HashMap<CourseCode, Vec<CourseCode>>) {
    let edges = selection.display.adjacency();
    let mut scope: HashSet<CourseCode> = selection.relevant.clone();
    scope.insert(selection.start.clone());
    for (from, to) in &selection.display.edges {
        scope.insert(from.clone());
        scope.insert(to.clone());
    }
    let roots = graph_roots(&edges, &scope);
    (roots, edges)
}

fn graph_roots(
    edges: &HashMap<CourseCode, Vec<CourseCode>>,
    scope: &HashSet<CourseCode>,
) -> Vec<CourseCode> {
    let mut indegree: HashMap<CourseCode, usize> = HashMap::new();
    for node in scope {
        indegree.entry(node.clone()).or_insert(0);
    }
    for targets in edges.values() {
        for target in targets {
            if let Some(entry) = indegree.get_mut(target) {
                *entry += 1;
            }
        }
    }
    let mut roots: Vec<CourseCode> = indegree
        .iter()
        .filter_map(|(node, &count)| if count == 0 { Some(node.clone()) } else { None })
        .collect();
    if roots.is_empty() {
        roots = scope.iter().cloned().collect();
    }
    roots.sort();
    roots
}

fn selection_to_json(
    selection: &Selection,
    curriculum: &Curriculum,
    resolved: &ResolvedConfig,
    caption: String,
) -> SelectionJson {
    let positions = semester_grid(curriculum.graph(), &resolved.settings.layout);
    let nodes = curriculum
        .graph()
        .courses()
        .map(|course| {
            let position = positions.get(&course.code);
            SelectionNodeJson {
                code: course.code.to_string(),
                title: course.title.clone(),
                semester: course.semester,
                class: selection
                    .display
                    .class_of(course.code.as_str())
                    .unwrap_or(NodeClass::Unrelated),
                x: position.map(|pos| pos.x).unwrap_or_default(),
                y: position.map(|pos| pos.y).unwrap_or_default(),
            }
        })
        .collect();
    let edges = selection
        .display
        .edges
        .iter()
        .map(|(from, to)| SelectionEdgeJson {
            from: from.to_string(),
            to: to.to_string(),
        })
        .collect();

    SelectionJson {
        course: selection.start.to_string(),
        policy: selection.display.policy.as_str(),
        scope: selection.scope.as_str(),
        caption,
        nodes,
        edges,
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CurriculumError::Other(anyhow::Error::new(err)))
}

#[derive(Serialize)]
struct CourseJson {
    code: String,
    title: String,
    semester: u32,
    prerequisites: Vec<String>,
    corequisites: Vec<String>,
}

#[derive(Serialize)]
struct SelectionJson {
    course: String,
    policy: &'static str,
    scope: &'static str,
    caption: String,
    nodes: Vec<SelectionNodeJson>,
    edges: Vec<SelectionEdgeJson>,
}

#[derive(Serialize)]
struct SelectionNodeJson {
    code: String,
    title: String,
    semester: u32,
    class: NodeClass,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct SelectionEdgeJson {
    from: String,
    to: String,
}

#[derive(Serialize)]
struct CheckJson {
    cycles: Vec<Vec<String>>,
    violations: Vec<CheckViolationJson>,
    unresolved: Vec<CheckUnresolvedJson>,
}

#[derive(Serialize)]
struct CheckViolationJson {
    requirement: String,
    requirement_semester: u32,
    course: String,
    course_semester: u32,
    kind: &'static str,
}

#[derive(Serialize)]
struct CheckUnresolvedJson {
    course: String,
    reference: String,
    kind: &'static str,
}

impl From<&CheckReport> for CheckJson {
    fn from(report: &CheckReport) -> Self {
        Self {
            cycles: report
                .cycles
                .iter()
                .map(|cycle| cycle.iter().map(|code| code.to_string()).collect())
                .collect(),
            violations: report
                .violations
                .iter()
                .map(|violation| CheckViolationJson {
                    requirement: violation.requirement.to_string(),
                    requirement_semester: violation.requirement_semester,
                    course: violation.course.to_string(),
                    course_semester: violation.course_semester,
                    kind: violation.kind.as_str(),
                })
                .collect(),
            unresolved: report
                .unresolved
                .iter()
                .map(|unresolved| CheckUnresolvedJson {
                    course: unresolved.course.to_string(),
                    reference: unresolved.reference.clone(),
                    kind: unresolved.kind.as_str(),
                })
                .collect(),
        }
    }
}
