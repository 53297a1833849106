use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use collabhub::config::Config;
use collabhub::db::{self, AppState, queries};
use collabhub::handlers;
use collabhub::models::{CreateTask, CreateTeam, CreateUser};
use collabhub::util::timestamp;

#[derive(Parser)]
#[command(name = "collabhub", version, about = "Project and team collaboration backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Create a user record
    CreateUser {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },
    /// Create a team record
    CreateTeam {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// User id of a team admin (repeatable)
        #[arg(long = "admin")]
        admins: Vec<String>,
        /// User id of a team contributor (repeatable)
        #[arg(long = "contributor")]
        contributors: Vec<String>,
    },
    /// Attach a task to an existing project
    CreateTask {
        /// Project id the task belongs to
        #[arg(long)]
        project: String,
        #[arg(long)]
        title: String,
        /// Unix seconds, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        due_date: Option<String>,
        /// User id of the assignee
        #[arg(long)]
        assigned_to: Option<String>,
        #[arg(long, default_value = "todo")]
        status: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("collabhub=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let pool = db::create_pool(&config.database_path, config.db_pool_size)
        .with_context(|| format!("failed to open database {}", config.database_path))?;
    {
        let conn = pool.get()?;
        db::init_db(&conn)?;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let state = AppState { db: pool };
            let mut app = handlers::app(state);
            if config.dev_mode {
                tracing::warn!("Dev mode enabled: CORS is permissive");
                app = app.layer(CorsLayer::permissive());
            }

            let listener = tokio::net::TcpListener::bind(config.addr()).await?;
            tracing::info!("collabhub listening on {}", config.addr());
            axum::serve(listener, app).await?;
        }
        Command::CreateUser {
            first_name,
            last_name,
            email,
        } => {
            let input = CreateUser {
                first_name,
                last_name,
                email,
            };
            input.validate()?;

            let conn = pool.get()?;
            let user = queries::create_user(&conn, &input)?;
            tracing::info!("Created user {} ({})", user.full_name(), user.id);
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::CreateTeam {
            title,
            description,
            admins,
            contributors,
        } => {
            let input = CreateTeam {
                title,
                description,
                admins,
                contributors,
            };
            input.validate()?;

            let conn = pool.get()?;
            for user_id in input.admins.iter().chain(input.contributors.iter()) {
                if queries::get_user_by_id(&conn, user_id)?.is_none() {
                    bail!("User {} not found", user_id);
                }
            }

            let team = queries::create_team(&conn, &input)?;
            tracing::info!("Created team {}", team.id);
            println!("{}", serde_json::to_string_pretty(&team)?);
        }
        Command::CreateTask {
            project,
            title,
            due_date,
            assigned_to,
            status,
        } => {
            let due_date = match due_date {
                Some(raw) => match raw.parse::<i64>().ok().or_else(|| timestamp::parse(&raw)) {
                    Some(secs) => Some(secs),
                    None => bail!("invalid due date: {}", raw),
                },
                None => None,
            };
            let input = CreateTask {
                title,
                due_date,
                assigned_to,
                status,
            };

            let conn = pool.get()?;
            if let Some(user_id) = &input.assigned_to {
                if queries::get_user_by_id(&conn, user_id)?.is_none() {
                    bail!("User {} not found", user_id);
                }
            }

            let task = queries::create_task(&conn, &project, &input)?;
            tracing::info!("Created task {} in project {}", task.id, task.project_id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
    }

    Ok(())
}
