use crate::demo::{run_demo, run_evaluate, run_questions, DemoArgs, EvaluateArgs, QuestionsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use skills_diagnostic::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Skills Diagnostic",
    about = "Serve and explore the Skills Diagnostic from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the questionnaire or score a set of answers
    Diagnostic {
        #[command(subcommand)]
        command: DiagnosticCommand,
    },
    /// Walk through a scripted diagnostic, including going back to change an answer
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum DiagnosticCommand {
    /// Print every question with its selectable values
    Questions(QuestionsArgs),
    /// Score a complete set of answers and print the recommendation
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Questionnaire JSON to serve instead of APP_DIAGNOSTIC_SCHEMA or the built-in one
    #[arg(long)]
    pub(crate) schema: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Diagnostic {
            command: DiagnosticCommand::Questions(args),
        } => run_questions(args),
        Command::Diagnostic {
            command: DiagnosticCommand::Evaluate(args),
        } => run_evaluate(args),
        Command::Demo(args) => run_demo(args),
    }
}
