use clap::CommandFactory;
use clap::Parser;
use clap_complete::generate;

use v1cli::commands::Cli;
use v1cli::commands::Commands;
use v1cli::commands::FeatureCommand;
use v1cli::commands::ProjectsCommand;
use v1cli::commands::StoryCommand;
use v1cli::commands::TaskCommand;
use v1cli::handlers;
use v1cli::handlers::HandlerContext;
use v1cli::storage::LocalStorage;
use v1cli::telemetry;
use v1cli_api::ApiError;
use v1cli_common::Colors;
use v1cli_common::color_init;
use v1cli_config::AuthError;
use v1cli_config::ConfigError;

fn main() {
    if let Err(e) = run() {
        if let Some(api_error) = e.downcast_ref::<ApiError>() {
            eprintln!("{} {}", Colors::error("Error:"), api_error);
            eprintln!("{} {}", Colors::dim("Suggestion:"), api_error.suggestion());
            if api_error.is_retryable() {
                eprintln!(
                    "{}",
                    Colors::dim("(This error may be transient - retry may succeed)")
                );
            }
            std::process::exit(api_error.exit_code());
        } else if let Some(auth_error) = e.downcast_ref::<AuthError>() {
            eprintln!("{} {}", Colors::error("Error:"), auth_error);
            std::process::exit(78); // EX_CONFIG
        } else if let Some(config_error) = e.downcast_ref::<ConfigError>() {
            eprintln!("{} {}", Colors::error("Error:"), config_error);
            std::process::exit(78); // EX_CONFIG
        } else {
            eprintln!("{} {}", Colors::error("Error:"), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    color_init(cli.no_color);
    let _telemetry = telemetry::init_tracing(if cli.verbose { "debug" } else { "warn" });

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "v1", &mut std::io::stdout());
        return Ok(());
    }

    let storage = LocalStorage::open()?;
    let format = cli.effective_format();
    let mut ctx = HandlerContext::new(storage, format);

    match cli.command {
        Commands::Completions { .. } => unreachable!(),

        Commands::Me => handlers::handle_me(&mut ctx)?,
        Commands::Setup => handlers::handle_setup(&mut ctx)?,
        Commands::Schema { asset_type, filter } => {
            handlers::handle_schema(&mut ctx, asset_type, filter)?
        }

        Commands::Projects { command } => match command {
            ProjectsCommand::List => handlers::handle_projects_list(&mut ctx)?,
            ProjectsCommand::All {
                output,
                output_format,
            } => handlers::handle_projects_all(&mut ctx, output, output_format)?,
            ProjectsCommand::Add { identifier } => {
                handlers::handle_projects_add(&mut ctx, identifier)?
            }
            ProjectsCommand::Rm { identifier } => {
                handlers::handle_projects_rm(&mut ctx, identifier)?
            }
            ProjectsCommand::Default { identifier } => {
                handlers::handle_projects_default(&mut ctx, identifier)?
            }
            ProjectsCommand::Configure {
                identifier,
                auto_detect,
                reset,
                show,
            } => handlers::handle_projects_configure(&mut ctx, identifier, auto_detect, reset, show)?,
        },

        Commands::Mine { all } => handlers::handle_mine(&mut ctx, all)?,

        Commands::Stories {
            parent,
            project,
            all,
        } => handlers::handle_stories(&mut ctx, parent, project, all)?,

        Commands::Story { number, command } => match command {
            Some(StoryCommand::Create {
                name,
                project,
                feature,
                estimate,
                description,
            }) => handlers::handle_story_create(
                &mut ctx,
                name,
                project,
                feature,
                estimate,
                description,
            )?,
            None => match number {
                Some(number) => handlers::handle_story(&mut ctx, number)?,
                None => {
                    ctx.exit_usage(
                        "Story number required.",
                        Some("Usage: v1 story <S-nnnn> or v1 story create <name>"),
                    );
                }
            },
        },

        Commands::Status { number, stage } => handlers::handle_status(&mut ctx, number, stage)?,
        Commands::Take { number } => handlers::handle_take(&mut ctx, number)?,

        Commands::Roadmap {
            project,
            all,
            output,
            output_format,
        } => handlers::handle_roadmap(&mut ctx, project, all, output, output_format)?,

        Commands::Features { parent, all } => handlers::handle_features(&mut ctx, parent, all)?,

        Commands::Feature { command } => match command {
            FeatureCommand::Create {
                name,
                parent,
                description,
            } => handlers::handle_feature_create(&mut ctx, name, parent, description)?,
        },

        Commands::Tasks { story } => handlers::handle_tasks(&mut ctx, story)?,

        Commands::Task { command } => match command {
            TaskCommand::Create {
                story,
                name,
                estimate,
            } => handlers::handle_task_create(&mut ctx, story, name, estimate)?,
            TaskCommand::Done { identifier } => handlers::handle_task_done(&mut ctx, identifier)?,
        },

        Commands::Tree {
            project,
            depth,
            all,
            types,
        } => handlers::handle_tree(&mut ctx, project, depth, all, types)?,

        Commands::Tui => v1cli::tui::run(&mut ctx)?,
    }

    Ok(())
}
