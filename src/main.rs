use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use assignment_tracker::client::{AssignmentApi, HttpApi};
use assignment_tracker::config::{ClientConfig, ServerConfig, CLIENT_PAGE_LIMIT};
use assignment_tracker::server::Server;
use assignment_tracker::shutdown::install_shutdown_handler;
use assignment_tracker::store::{Assignment, AssignmentInput, IdStrategy, PersistMode};

#[derive(Parser, Debug)]
#[command(name = "assignment-tracker")]
#[command(version)]
#[command(about = "Track assignments through a paginated JSON API")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the API server
    Server(ServerArgs),

    /// Assignment management commands
    Assignment {
        #[command(flatten)]
        client: ClientArgs,

        #[command(subcommand)]
        command: AssignmentCommands,
    },
}

// =============================================================================
// Server Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ServerArgs {
    /// Port to listen on
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// JSON file holding the assignments
    #[arg(long, default_value = "data.json")]
    data_file: PathBuf,

    /// How ids are assigned to new assignments
    #[arg(long, value_enum, default_value = "monotonic")]
    id_strategy: IdStrategy,

    /// Which changes are written back to the data file
    #[arg(long, value_enum, default_value = "create-only")]
    persist: PersistMode,
}

// =============================================================================
// Client Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ClientArgs {
    /// Server address
    #[arg(long, short = 'a', default_value = "http://127.0.0.1:3000")]
    addr: String,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(clap::Subcommand, Debug)]
enum AssignmentCommands {
    /// List one page of assignments
    List {
        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value_t = CLIENT_PAGE_LIMIT)]
        limit: u32,
    },
    /// Show the number of assignments
    Count,
    /// Show a single assignment
    Get { id: u64 },
    /// Create an assignment
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        due_date: String,

        #[arg(long)]
        submitted: bool,
    },
    /// Replace the fields of an assignment. Omitted fields are cleared.
    Update {
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        due_date: Option<String>,

        #[arg(long)]
        submitted: Option<bool>,
    },
    /// Delete an assignment
    Delete { id: u64 },
}

// =============================================================================
// Output Helpers
// =============================================================================

fn print_table(assignments: &[Assignment]) {
    if assignments.is_empty() {
        println!("No assignments found.");
        return;
    }

    println!("{:<6} {:<30} {:<12} SUBMITTED", "ID", "NAME", "DUE DATE");
    println!("{}", "-".repeat(60));
    for a in assignments {
        let name = a.name.as_deref().unwrap_or("-");
        // Truncate long names so columns stay aligned
        let name = if name.chars().count() > 30 {
            format!("{}...", name.chars().take(27).collect::<String>())
        } else {
            name.to_string()
        };
        println!(
            "{:<6} {:<30} {:<12} {}",
            a.id,
            name,
            a.due_date.as_deref().unwrap_or("-"),
            if a.is_submitted() { "Yes" } else { "No" }
        );
    }
}

fn print_assignments(
    assignments: &[Assignment],
    output: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(assignments)?),
        OutputFormat::Table => print_table(assignments),
    }
    Ok(())
}

// =============================================================================
// Server Implementation
// =============================================================================

async fn run_server(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let listen_addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let config = ServerConfig::new(listen_addr, args.data_file)
        .with_id_strategy(args.id_strategy)
        .with_persist_mode(args.persist);

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_file = %config.data_file.display(),
        id_strategy = ?config.id_strategy,
        persist_mode = ?config.persist_mode,
        "Starting assignment tracker"
    );

    let shutdown = install_shutdown_handler();
    Server::new(config).run(shutdown).await?;
    Ok(())
}

// =============================================================================
// Client Command Handlers
// =============================================================================

async fn handle_assignment_command(
    api: &HttpApi,
    command: AssignmentCommands,
    output: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        AssignmentCommands::List { page, limit } => {
            let assignments = api.list(page, limit).await?;
            print_assignments(&assignments, output)?;
        }
        AssignmentCommands::Count => {
            let count = api.count().await?;
            match output {
                OutputFormat::Json => println!("{}", serde_json::json!({ "count": count })),
                OutputFormat::Table => println!("Assignments: {}", count),
            }
        }
        AssignmentCommands::Get { id } => {
            let assignment = api.get(id).await?;
            print_assignments(std::slice::from_ref(&assignment), output)?;
        }
        AssignmentCommands::Add {
            name,
            due_date,
            submitted,
        } => {
            let input = AssignmentInput::new(name, due_date).with_submitted(submitted);
            let assignment = api.create(&input).await?;
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&assignment)?),
                OutputFormat::Table => println!("Assignment {} created", assignment.id),
            }
        }
        AssignmentCommands::Update {
            id,
            name,
            due_date,
            submitted,
        } => {
            let input = AssignmentInput {
                name,
                due_date,
                submitted,
            };
            let assignment = api.update(id, &input).await?;
            print_assignments(std::slice::from_ref(&assignment), output)?;
        }
        AssignmentCommands::Delete { id } => {
            api.delete(id).await?;
            println!("Assignment {} deleted", id);
        }
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Server(server_args) => {
            run_server(server_args).await?;
        }
        Commands::Assignment { client, command } => {
            let api = HttpApi::new(ClientConfig::new(client.addr));
            if let Err(e) = handle_assignment_command(&api, command, &client.output).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
