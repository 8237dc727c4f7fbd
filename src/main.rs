use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sandwich_hub::{
    ArcStr,
    api::OptionKind,
    app::{App, Command, Recipe},
    arc_path,
    utils::install_panic_hook,
};

#[derive(Parser)]
#[command(name = "sandwich-hub")]
#[command(about = "A terminal client for the Sandwich Shop")]
struct Cli {
    /// Configuration file to use instead of ~/.config/sandwich-hub/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal UI (the default)
    Tui,
    /// List every sandwich
    List,
    /// List the sandwiches of the logged in user
    Mine,
    /// Show one sandwich
    Show { id: i64 },
    /// List the options of one kind, or of every kind
    Options {
        #[arg(value_enum)]
        kind: Option<OptionKind>,
    },
    /// Delete a sandwich
    Delete { id: i64 },
    /// Log in and keep the token for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Code from the authenticator app, when the account uses MFA
        #[arg(long)]
        code: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Ask for password reset instructions
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Check whether an email is registered
    Exists {
        #[arg(long)]
        email: String,
    },
    /// Build a new sandwich from option labels
    Build(RecipeArgs),
    /// Change a sandwich. Categories not given are kept
    Edit {
        id: i64,
        #[command(flatten)]
        recipe: RecipeArgs,
    },
}

/// Option labels are matched ignoring case. `none` picks no option of a
/// category.
#[derive(Args)]
struct RecipeArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    bread: Option<String>,
    #[arg(long = "cheese")]
    cheeses: Vec<String>,
    #[arg(long = "dressing")]
    dressings: Vec<String>,
    #[arg(long = "meat")]
    meats: Vec<String>,
    #[arg(long = "topping")]
    toppings: Vec<String>,
    #[arg(long)]
    toasted: Option<bool>,
    #[arg(long)]
    price: Option<f64>,
}

fn arc_strs(values: Vec<String>) -> Vec<ArcStr> {
    values.into_iter().map(ArcStr::from).collect()
}

impl From<RecipeArgs> for Recipe {
    fn from(args: RecipeArgs) -> Self {
        Self {
            name: args.name.map(ArcStr::from),
            bread: args.bread.map(ArcStr::from),
            cheeses: arc_strs(args.cheeses),
            dressings: arc_strs(args.dressings),
            meats: arc_strs(args.meats),
            toppings: arc_strs(args.toppings),
            toasted: args.toasted,
            price: args.price,
        }
    }
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Tui => Command::Tui,
            Commands::List => Command::List,
            Commands::Mine => Command::Mine,
            Commands::Show { id } => Command::Show { id },
            Commands::Options { kind } => Command::Options { kind },
            Commands::Delete { id } => Command::Delete { id },
            Commands::Login {
                email,
                password,
                code,
            } => Command::Login {
                email: email.into(),
                password: password.into(),
                code: code.map(ArcStr::from),
            },
            Commands::Logout => Command::Logout,
            Commands::Register { email, password } => Command::Register {
                email: email.into(),
                password: password.into(),
            },
            Commands::ForgotPassword { email } => Command::ForgotPassword {
                email: email.into(),
            },
            Commands::Exists { email } => Command::Exists {
                email: email.into(),
            },
            Commands::Build(recipe) => Command::Build(recipe.into()),
            Commands::Edit { id, recipe } => Command::Edit {
                id,
                recipe: recipe.into(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    install_panic_hook()?;

    let cli = Cli::parse();
    let command = cli.command.map(Command::from).unwrap_or_default();

    let app = App::build(cli.config.map(arc_path)).await?;
    let res = match command {
        Command::Tui => app.run_tui().await,
        command => app.resolve(command).await.map(|out| println!("{out}")),
    };
    app.shutdown().await;
    res
}
