use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use qwat_app::{
    activate, categories, open_store, project, AccessGate, Activation, CategoryFilter,
    GateOutcome, Listing, NewListing, PaymentInstructions, PriceInput, ViewState,
};
use qwat_kernel::settings::Settings;

/// Browse and manage the qwat book catalog.
#[derive(Debug, Parser)]
#[command(name = "qwat", version, about)]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List listings, optionally narrowed by category and search text
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// List category choices
    Categories,
    /// Add a listing (requires the admin passcode)
    Add(AddArgs),
    /// Remove a listing (requires the admin passcode)
    Remove {
        #[arg(long)]
        passcode: String,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show what activating a listing does
    Activate { id: String },
    /// Show payment instructions for paid listings
    PaymentInfo,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    passcode: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// Amount, or "free"
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    link: Option<String>,
    #[arg(long)]
    payment_required: bool,
}

impl AddArgs {
    fn to_new_listing(&self) -> NewListing {
        NewListing {
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            price: self.price.as_deref().map(PriceInput::from),
            link: self.link.clone(),
            is_payment_required: self.payment_required,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load qwat settings")?;
    qwat_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "qwat cli");

    run(cli, &settings)
}

fn run(cli: Cli, settings: &Settings) -> anyhow::Result<()> {
    let mut store = open_store(&settings.storage).with_context(|| {
        format!(
            "failed to open catalog in {}",
            settings.storage.data_dir.display()
        )
    })?;

    match cli.command {
        Command::List { category, search } => {
            let view = ViewState::new(
                CategoryFilter::from_label(category.as_deref().unwrap_or_default()),
                search.unwrap_or_default(),
            );
            let listings = project(store.listings(), &view);
            if cli.json {
                print_json(&listings)?;
            } else {
                for listing in listings {
                    println!("{}", listing_line(listing));
                }
            }
        }
        Command::Categories => {
            let categories = categories(store.listings());
            if cli.json {
                print_json(&categories)?;
            } else {
                for category in categories {
                    println!("{}", category.label());
                }
            }
        }
        Command::Add(args) => {
            check_passcode(settings, &args.passcode)?;
            match store.add(&args.to_new_listing())? {
                Some(listing) if cli.json => print_json(&listing)?,
                Some(listing) => println!("added {}", listing_line(&listing)),
                None => eprintln!("nothing added: title is required"),
            }
        }
        Command::Remove { passcode, id, yes } => {
            check_passcode(settings, &passcode)?;

            let Some(listing) = store.catalog().get(&id) else {
                bail!("listing '{id}' not found");
            };
            if !yes && !confirm(&format!("Remove '{}'?", listing.title))? {
                eprintln!("nothing removed");
                return Ok(());
            }

            if let Some(removed) = store.remove(&id)? {
                println!("removed {}", listing_line(&removed));
            }
        }
        Command::Activate { id } => {
            let Some(listing) = store.catalog().get(&id) else {
                bail!("listing '{id}' not found");
            };
            let instructions = PaymentInstructions::from_settings(&settings.payment);

            match activate(listing) {
                Activation::ShowPaymentInstructions(listing) if cli.json => {
                    print_json(&serde_json::json!({
                        "action": "payment",
                        "listing": listing,
                        "price": listing.price.label(),
                        "instructions": instructions,
                    }))?;
                }
                Activation::ShowPaymentInstructions(listing) => {
                    println!("{} costs {}", listing.title, listing.price);
                    print_instructions(&instructions);
                }
                Activation::Navigate(url) if cli.json => {
                    print_json(&serde_json::json!({ "action": "navigate", "url": url }))?;
                }
                Activation::Navigate(url) => println!("open {url}"),
                Activation::Nothing if cli.json => {
                    print_json(&serde_json::json!({ "action": "none" }))?;
                }
                Activation::Nothing => {}
            }
        }
        Command::PaymentInfo => {
            let instructions = PaymentInstructions::from_settings(&settings.payment);
            if cli.json {
                print_json(&instructions)?;
            } else {
                print_instructions(&instructions);
            }
        }
    }

    Ok(())
}

fn check_passcode(settings: &Settings, passcode: &str) -> anyhow::Result<()> {
    let mut gate = AccessGate::new(settings.admin.passcode.clone());
    match gate.submit_code(passcode) {
        GateOutcome::Granted => Ok(()),
        GateOutcome::Rejected => bail!("passcode did not match"),
    }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn listing_line(listing: &Listing) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        listing.id, listing.price, listing.title, listing.author, listing.category
    )
}

fn print_instructions(instructions: &PaymentInstructions) {
    println!("card:    {}", instructions.card_number);
    println!("wallet:  {}", instructions.wallet_number);
    println!("contact: {}", instructions.contact_url);
    for (index, step) in instructions.steps.iter().enumerate() {
        println!("{}. {}", index + 1, step);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
