// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DogOut command-line client.
//!
//! Registers accounts and manages dogs against the configured Firebase
//! project. Logs go to stderr as JSON; command output goes to stdout.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dogout::{
    config::Config,
    db::FirebaseDb,
    models::{DogId, Sex},
    services::{AccountService, ActiveSession},
    time_utils::format_utc_rfc3339,
    validation::{DogForm, LoginForm, RegistrationForm},
    AppError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dogout", about = "Track when your dogs were last taken out")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "DOGOUT_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_repeat: String,
    },
    /// List dogs and when they were last out
    Dogs {
        #[command(flatten)]
        login: LoginArgs,
    },
    /// Add a dog
    AddDog {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        name: String,
        #[arg(long)]
        race: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        sex: Sex,
    },
    /// Remove a dog
    RemoveDog {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        dog: String,
    },
    /// Take one or more dogs out now
    Walk {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long = "dog", required = true)]
        dogs: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    // Connection parameters must be in place before any store call
    let config = Config::from_env().context("Failed to load configuration")?;
    let service = AccountService::new(FirebaseDb::new(&config));

    match run(&service, cli.command).await {
        Err(AppError::Validation(errors)) => {
            for error in &errors {
                eprintln!("{}", error);
            }
            std::process::exit(2);
        }
        other => other.map_err(anyhow::Error::from),
    }
}

async fn run(service: &AccountService<FirebaseDb>, command: Command) -> dogout::Result<()> {
    match command {
        Command::Register {
            username,
            email,
            phone,
            password,
            password_repeat,
        } => {
            let form = RegistrationForm {
                username,
                email,
                phone,
                password,
                password_repeat,
            };
            let user_id = service.register(&form).await?;
            println!("Registered {}. Check your inbox to verify your email.", user_id);
        }
        Command::Dogs { login } => {
            let active = log_in(service, login).await?;
            println!("Hello {}!", active.user().username);
            print_dogs(&active);
        }
        Command::AddDog {
            login,
            name,
            race,
            age,
            sex,
        } => {
            let mut active = log_in(service, login).await?;
            let form = DogForm {
                name,
                race,
                age,
                sex,
            };
            let dog_id = service.add_dog(&mut active, &form).await?;
            println!("Added {} ({})", form.name, dog_id);
        }
        Command::RemoveDog { login, dog } => {
            let mut active = log_in(service, login).await?;
            let removed = service.remove_dog(&mut active, &DogId::from(dog)).await?;
            println!("Removed {}", removed.name);
        }
        Command::Walk { login, dogs } => {
            let mut active = log_in(service, login).await?;
            let ids: Vec<DogId> = dogs.into_iter().map(DogId::from).collect();
            let now = chrono::Utc::now();
            service.take_out(&mut active, &ids, now).await?;
            println!("Walk recorded at {}", format_utc_rfc3339(now));
            print_dogs(&active);
        }
    }
    Ok(())
}

async fn log_in(
    service: &AccountService<FirebaseDb>,
    args: LoginArgs,
) -> dogout::Result<ActiveSession> {
    service
        .login(&LoginForm {
            email: args.email,
            password: args.password,
        })
        .await
}

fn print_dogs(active: &ActiveSession) {
    let now = chrono::Utc::now();
    if active.dogs().is_empty() {
        println!("No dogs yet.");
    }
    for dog in active.dogs() {
        println!("{} [{}]: {}", dog.name, dog.id, dog.walk_status(now));
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dogout=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
