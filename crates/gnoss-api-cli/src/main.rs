use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use gnoss_api_core::category::{name::display_name, CategoryNode, CategoryTree};
use gnoss_api_core::{
    BulkOptions, BulkReport, Config, GnossApiError, GnossClient, ResolutionMode,
    ResolutionRequest, ResourceDraft, Result,
};

mod args;
mod logging;
use args::{CategoryAction, Cli, Commands, ConfigAction, ResourceAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let base_dir = resolve_base_dir(cli.base_dir);

    // logging needs the config; a broken config is still reported below
    let config = Config::load(&base_dir);
    let (level, format) = match &config {
        Ok(config) => (config.log.level.as_str(), config.log.format),
        Err(_) => ("info", Default::default()),
    };
    logging::init_logging(
        logging::effective_level(level, cli.verbose, cli.quiet),
        format,
    );
    tracing::debug!(base_dir = %base_dir.display(), "using base directory");

    let result = match cli.command {
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Category { action }) => {
            config.and_then(|config| handle_category(action, &config))
        }
        Some(Commands::Resource { action }) => {
            config.and_then(|config| handle_resource(action, &config))
        }
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "gnoss-api", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("GNOSS_API_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".gnoss-api"))
        .unwrap_or_else(|| PathBuf::from(".gnoss-api"))
}

// ========== Config ==========

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(GnossApiError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            let shown = if key.ends_with("secret") { "********" } else { value.as_str() };
            println!("{} {} = {}", "Set:".green(), key, shown);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

// ========== Category ==========

fn handle_category(action: CategoryAction, config: &Config) -> Result<()> {
    let client = GnossClient::from_config(config)?;

    match action {
        CategoryAction::Tree {
            community,
            lang,
            ids,
        } => {
            let directory = client.community().get_categories(&community)?;
            let tree = CategoryTree::build(directory);
            print_tree(&tree, lang.as_deref(), ids);
        }
        CategoryAction::Resolve {
            community,
            flat,
            names,
        } => {
            let request = if flat {
                ResolutionRequest::flat(community, names)
            } else {
                ResolutionRequest::hierarchical(community, names)
            };
            let report = client.thesaurus().resolve(&request)?;
            for id in &report.ids {
                println!("{}", id);
            }
        }
    }

    Ok(())
}

fn print_tree(tree: &CategoryTree, lang: Option<&str>, show_ids: bool) {
    if tree.is_empty() {
        println!("No categories in {}.", tree.scope());
        return;
    }

    println!();
    println!("{} ({} categories)", tree.scope().bold(), tree.len());
    for line in tree_lines(tree, lang, show_ids) {
        println!("{}", line);
    }

    let orphans: Vec<_> = tree.orphans().collect();
    if !orphans.is_empty() {
        println!();
        println!("{}", "Orphaned (parent missing):".yellow());
        for orphan in orphans {
            println!("  {}", node_label(orphan, lang, show_ids));
        }
    }
    println!();
}

/// Box-drawn lines for every attached category, depth first.
///
/// Walks with an explicit stack so deep chains do not grow the call stack.
fn tree_lines(tree: &CategoryTree, lang: Option<&str>, show_ids: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(tree.len());
    let mut stack: Vec<(CategoryNode<'_>, String, bool)> = Vec::new();

    let roots: Vec<_> = tree.roots().collect();
    push_siblings(&mut stack, &roots, String::new());

    while let Some((node, prefix, last)) = stack.pop() {
        let branch = if last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, branch, node_label(node, lang, show_ids)));

        let children: Vec<_> = node.children().collect();
        let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        push_siblings(&mut stack, &children, child_prefix);
    }
    lines
}

/// Push in reverse so the first sibling is popped first
fn push_siblings<'a>(stack: &mut Vec<(CategoryNode<'a>, String, bool)>, nodes: &[CategoryNode<'a>], prefix: String) {
    for (i, node) in nodes.iter().enumerate().rev() {
        stack.push((*node, prefix.clone(), i + 1 == nodes.len()));
    }
}

fn node_label(node: CategoryNode<'_>, lang: Option<&str>, show_ids: bool) -> String {
    let name = display_name(node.name(), lang);
    if show_ids {
        format!("{} {}", name, node.id().to_string().dimmed())
    } else {
        name.to_string()
    }
}

// ========== Resource ==========

fn handle_resource(action: ResourceAction, config: &Config) -> Result<()> {
    let client = GnossClient::from_config(config)?;
    let options = BulkOptions::from_config(&config.load);

    match action {
        ResourceAction::Load {
            community,
            file,
            flat,
        } => {
            let content = fs::read_to_string(&file)?;
            let drafts: Vec<ResourceDraft> = serde_json::from_str(&content)?;
            let mode = if flat {
                ResolutionMode::Flat
            } else {
                ResolutionMode::Hierarchical
            };

            let report = client.resources().load_resources(
                &community,
                &drafts,
                &options.with_category_mode(mode),
            );
            finish_bulk("Loaded", &report, drafts.len())
        }
        ResourceAction::Delete { community, ids } => {
            let report = client
                .resources()
                .delete_resources(&community, &ids, &options);
            finish_bulk("Deleted", &report, ids.len())
        }
    }
}

fn finish_bulk(verb: &str, report: &BulkReport, total: usize) -> Result<()> {
    for id in &report.succeeded {
        println!("{} {}", format!("{}:", verb).green(), id);
    }
    for failure in &report.failed {
        let target = failure
            .resource_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| format!("#{}", failure.index));
        println!(
            "{} {} ({} attempts): {}",
            "Failed:".red(),
            target,
            failure.attempts,
            failure.error
        );
    }

    if report.is_complete() {
        Ok(())
    } else {
        Err(GnossApiError::BulkIncomplete {
            failed: report.failed.len(),
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use gnoss_api_core::{Category, CategoryDirectory};
    use uuid::Uuid;

    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn tree_lines_keep_depth_first_order() {
        let directory = CategoryDirectory::new(
            "c",
            vec![
                Category::new(id(1), "Tech"),
                Category::new(id(2), "AI").with_parent(id(1)),
                Category::new(id(3), "Robotics").with_parent(id(2)),
                Category::new(id(4), "Web").with_parent(id(1)),
                Category::new(id(5), "Arts"),
            ],
        );
        let tree = CategoryTree::build(directory);

        assert_eq!(
            tree_lines(&tree, None, false),
            vec![
                "├── Tech",
                "│   ├── AI",
                "│   │   └── Robotics",
                "│   └── Web",
                "└── Arts",
            ]
        );
    }

    #[test]
    fn tree_lines_handle_deep_chains() {
        let depth = 2_000u128;
        let categories = (1..=depth)
            .map(|n| {
                let category = Category::new(id(n), format!("L{}", n));
                if n == 1 { category } else { category.with_parent(id(n - 1)) }
            })
            .collect();
        let tree = CategoryTree::build(CategoryDirectory::new("c", categories));

        let lines = tree_lines(&tree, None, false);
        assert_eq!(lines.len(), depth as usize);
        assert!(lines[depth as usize - 1].ends_with("└── L2000"));
    }
}
