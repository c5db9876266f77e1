use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lectern_adapters::{AdapterFactory, CoursePort, verify_port};
use lectern_core::config::{AdapterMode, Config};
use lectern_core::init_logging;
use lectern_core::types::Section;

/// Lectern - course content access through interchangeable adapters
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(about = "Browse and search course materials from the command line", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to lectern.toml (default: ./lectern.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Adapter mode override: stub, file, or real
    #[arg(short, long, value_name = "MODE")]
    mode: Option<AdapterMode>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show metadata for a course
    Info {
        /// Course identifier
        #[arg(required = true, value_name = "COURSE_ID")]
        course_id: String,
    },
    /// Print a course's section and item tree
    Content {
        /// Course identifier
        #[arg(required = true, value_name = "COURSE_ID")]
        course_id: String,

        /// Emit the full structure as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Print the extracted text of a content item
    Item {
        /// Item identifier
        #[arg(required = true, value_name = "ITEM_ID")]
        item_id: String,
    },
    /// Search within a course's materials
    Search {
        /// Search query (matched against item names and bodies)
        #[arg(required = true, value_name = "QUERY")]
        query: String,

        /// Course to search in
        #[arg(short = 'C', long, required = true, value_name = "COURSE_ID")]
        course: String,
    },
    /// Show adapter configuration and port conformance
    Status,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from("lectern.toml"));
    let config = load_or_create_config(&config_path)?;

    init_logging(Some(config.logging.clone())).map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    if cli.verbose {
        println!("{} Using config: {}", "Info:".blue().bold(), config_path.display());
        println!(
            "{} Adapter mode: {}",
            "Info:".blue().bold(),
            cli.mode.unwrap_or(config.adapter.mode)
        );
    }

    let port = AdapterFactory::create(&config.adapter, cli.mode)
        .map_err(|e| anyhow::anyhow!("Failed to create adapter: {}", e))?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async {
        match cli.command {
            Commands::Info { course_id } => cmd_info(port, &course_id).await,
            Commands::Content { course_id, json } => cmd_content(port, &course_id, json).await,
            Commands::Item { item_id } => cmd_item(port, &item_id).await,
            Commands::Search { query, course } => cmd_search(port, &query, &course).await,
            Commands::Status => cmd_status(port, &config, cli.verbose).await,
        }
    })?;

    Ok(())
}

/// Load config from file or create from example
fn load_or_create_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::from_file(&PathBuf::from(path)).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    } else if path == Path::new("lectern.toml") {
        // only auto-create the default file, never an explicit --config path
        std::fs::write(path, Config::example()).context("Failed to create config")?;
        println!(
            "{} Created config at {} with defaults",
            "Info:".blue().bold(),
            path.display()
        );
        Ok(Config::default())
    } else {
        anyhow::bail!("Config file not found: {}", path.display())
    }
}

async fn cmd_info(port: Arc<dyn CoursePort>, course_id: &str) -> Result<()> {
    let info = port.get_course_info(course_id).await?;

    println!("{}", info.name.green().bold());
    println!("  Id:         {}", info.id.cyan());
    println!("  Code:       {}", info.code.cyan());
    println!("  Instructor: {}", info.instructor);
    println!("  Semester:   {}", info.semester);

    Ok(())
}

async fn cmd_content(port: Arc<dyn CoursePort>, course_id: &str, json: bool) -> Result<()> {
    let content = port.get_course_content(course_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&content)?);
        return Ok(());
    }

    println!("{}", content.course_id.green().bold());
    for section in &content.sections {
        print_section(section, 1);
    }

    Ok(())
}

fn print_section(section: &Section, indent: usize) {
    let pad = "  ".repeat(indent);
    let marker = if section.is_visible { "" } else { " (hidden)" };
    println!("{pad}{}{}", section.name.blue().bold(), marker.yellow());

    for item in &section.items {
        println!("{pad}  {} [{}] {}", item.name, item.item_type.as_str().cyan(), item.id.dimmed());
    }
    for sub in &section.subsections {
        print_section(sub, indent + 1);
    }
}

async fn cmd_item(port: Arc<dyn CoursePort>, item_id: &str) -> Result<()> {
    let body = port.get_item_content(item_id).await?;

    if body.is_empty() {
        println!("{} Item {} has no extractable text", "Info:".yellow().bold(), item_id.cyan());
    } else {
        println!("{body}");
    }

    Ok(())
}

async fn cmd_search(port: Arc<dyn CoursePort>, query: &str, course_id: &str) -> Result<()> {
    let results = port.search(query, course_id).await?;

    if results.is_empty() {
        println!("{} No matches for \"{}\"", "Info:".yellow().bold(), query);
        return Ok(());
    }

    println!("{} {} match(es) for \"{}\"", "Info:".green().bold(), results.len(), query);
    for result in &results {
        println!(
            "  {} {} ({}, score {:.1})",
            "-".dimmed(),
            result.item.name.cyan().bold(),
            result.section_name,
            result.relevance_score
        );
        println!("    {}", result.snippet.dimmed());
    }

    Ok(())
}

async fn cmd_status(port: Arc<dyn CoursePort>, config: &Config, verbose: bool) -> Result<()> {
    println!("{}", "Lectern Status".green().bold().underline());
    println!();

    println!("{} Configuration", "Info:".blue().bold());
    println!("  Adapter mode: {}", config.adapter.mode.to_string().cyan());
    println!("  Stub scenario: {}", config.adapter.stub.scenario.cyan());
    println!("  Stubs root: {}", config.adapter.stub.stubs_root.display());
    println!("  Courses path: {}", config.adapter.file.courses_path.display());

    if verbose {
        let stubs_root = &config.adapter.stub.stubs_root;
        if stubs_root.exists() {
            let scenarios = list_scenarios(stubs_root)?;
            println!("  Available scenarios: {}", scenarios.len().to_string().cyan());
            for name in &scenarios {
                println!("    - {}", name.cyan());
            }
        } else {
            println!("  {} Stubs root does not exist", "Warning:".yellow().bold());
        }
    }

    println!();
    println!("{} Port conformance", "Info:".blue().bold());
    let probe = verify_port(port.as_ref()).await;
    print_probe("get_course_info", probe.course_info);
    print_probe("get_course_content", probe.course_content);
    print_probe("get_item_content", probe.item_content);
    print_probe("search", probe.search);

    if probe.is_conformant() {
        println!("{} Adapter responds on all four operations", "Success:".green().bold());
    } else {
        println!("{} Adapter failed one or more probes", "Warning:".yellow().bold());
    }

    Ok(())
}

fn print_probe(name: &str, ok: bool) {
    let status = if ok { "ok".green().to_string() } else { "failed".red().to_string() };
    println!("  {name}: {status}");
}

/// Scenario folder names under the stubs root, sorted.
fn list_scenarios(stubs_root: &Path) -> Result<Vec<String>> {
    let mut scenarios: Vec<String> = std::fs::read_dir(stubs_root)
        .context("Failed to read stubs root")?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    scenarios.sort();
    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["lectern", "status"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.mode.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::try_parse_from(["lectern", "--config", "/path/to/lectern.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/lectern.toml")));
    }

    #[test]
    fn test_cli_with_mode() {
        let cli = Cli::try_parse_from(["lectern", "--mode", "file", "status"]).unwrap();
        assert_eq!(cli.mode, Some(AdapterMode::File));

        let result = Cli::try_parse_from(["lectern", "--mode", "carrier-pigeon", "status"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_info_command() {
        let cli = Cli::try_parse_from(["lectern", "info", "COMP1001-2024"]).unwrap();
        if let Commands::Info { course_id } = cli.command {
            assert_eq!(course_id, "COMP1001-2024");
        } else {
            panic!("Expected Info command");
        }
    }

    #[test]
    fn test_cli_content_command() {
        let cli = Cli::try_parse_from(["lectern", "content", "COMP1001-2024", "--json"]).unwrap();
        if let Commands::Content { course_id, json } = cli.command {
            assert_eq!(course_id, "COMP1001-2024");
            assert!(json);
        } else {
            panic!("Expected Content command");
        }
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::try_parse_from(["lectern", "search", "recursion", "--course", "COMP1001-2024"]).unwrap();
        if let Commands::Search { query, course } = cli.command {
            assert_eq!(query, "recursion");
            assert_eq!(course, "COMP1001-2024");
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_cli_search_requires_course() {
        let result = Cli::try_parse_from(["lectern", "search", "recursion"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_existing() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("lectern.toml");
        std::fs::write(&config_path, Config::example()).unwrap();

        let config = load_or_create_config(&config_path).unwrap();
        assert_eq!(config.adapter.stub.scenario, "demo_course");
    }

    #[test]
    fn test_load_config_explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("missing.toml");

        let result = load_or_create_config(&config_path);
        assert!(result.is_err());
        assert!(!config_path.exists());
    }

    #[test]
    fn test_load_config_invalid() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("lectern.toml");
        std::fs::write(&config_path, "invalid toml").unwrap();

        let result = load_or_create_config(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_scenarios_sorted() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("zeta")).unwrap();
        std::fs::create_dir(temp.path().join("alpha")).unwrap();
        std::fs::write(temp.path().join("stray.txt"), "not a scenario").unwrap();

        let scenarios = list_scenarios(temp.path()).unwrap();
        assert_eq!(scenarios, vec!["alpha".to_string(), "zeta".to_string()]);
    }
}
