use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use freebie_tracker::logging::init_logger;
use freebie_tracker::{
    import_freebies, load_freebie_csv, open_database, run_debug_session, seed_database,
    verify_count, DebugReport, Roster, SeedSet,
};

#[derive(Parser, Debug)]
#[command(name = "freebie-tracker", version, about = "Track which dev got which freebie from which company")]
struct CliArgs {
    /// SQLite database file
    #[arg(long, env = "FREEBIES_DB", default_value = "freebies.db", global = true)]
    db: PathBuf,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clear all tables and insert the sample data
    Seed {
        /// Only the basic set (no Microsoft, Emma or Mousepad)
        #[arg(long)]
        basic: bool,
    },

    /// Seed the debug data and walk through every operation
    Debug,

    /// Import freebies from a CSV file (item_name,value,dev,company,founding_year)
    Import { csv: PathBuf },

    /// Print every company, dev and freebie
    Report {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logger(args.verbose);

    let mut conn = open_database(&args.db)?;

    match args.command {
        Command::Seed { basic } => {
            let set = if basic { SeedSet::Basic } else { SeedSet::Debug };
            let summary = seed_database(&mut conn, set)?;
            println!(
                "🌱 Seeding complete! {} companies, {} devs, {} freebies.",
                summary.companies, summary.devs, summary.freebies
            );
        }
        Command::Debug => {
            let report = run_debug_session(&mut conn)?;
            print_debug_report(&report);
        }
        Command::Import { csv } => {
            println!("📂 Loading CSV...");
            let records = load_freebie_csv(&csv)?;
            println!("✓ Loaded {} rows from CSV", records.len());

            let inserted = import_freebies(&mut conn, &records)?;
            println!("✓ Inserted {} freebies", inserted);
            println!("✓ Database contains {} freebies", verify_count(&conn)?);
        }
        Command::Report { json } => {
            let roster = Roster::load(&conn)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&roster)?);
            } else {
                print_roster(&roster);
            }
        }
    }

    Ok(())
}

fn print_roster(roster: &Roster) {
    println!("🏢 Companies");
    for company in &roster.companies {
        let devs: Vec<&str> = roster
            .devs_of_company(company)
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        println!("  {} ({}) → devs: {:?}", company.name, company.founding_year, devs);
    }

    println!("\n👩‍💻 Devs");
    for dev in &roster.devs {
        let companies: Vec<&str> = roster
            .companies_of_dev(dev)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        println!(
            "  {} → freebies: {:?}, companies: {:?}",
            dev.name,
            roster.item_names_of_dev(dev),
            companies
        );
    }

    println!("\n🎁 Freebies");
    for freebie in &roster.freebies {
        println!("  ${:<4} {}", freebie.value, roster.describe(freebie));
    }

    if let Some(oldest) = roster.oldest_company() {
        println!("\nOldest company: {} (founded in {})", oldest.name, oldest.founding_year);
    }
}

fn print_debug_report(report: &DebugReport) {
    let rule = "-".repeat(30);

    println!("--- Starting Debug Session ---");

    println!("\n--- Testing Relationship Attributes ---");
    println!("Freebie: T-shirt");
    println!("  -> Dev: {}", report.tshirt_owner);
    println!("  -> Company: {}", report.tshirt_issuer);
    println!("\nDev: Happiness");
    println!("  -> Freebies: {:?}", report.happiness_freebies);
    println!("  -> Companies: {:?}", report.happiness_companies);
    println!("\nCompany: Google");
    println!("  -> Freebies: {:?}", report.google_freebies);
    println!("  -> Devs: {:?}", report.google_devs);
    println!("{}", rule);

    println!("\n--- Testing Freebie.describe() ---");
    println!("Details for T-Shirt: {}", report.tshirt_details);
    println!("{}", rule);

    println!("\n--- Testing Company.issue_freebie() ---");
    println!("Samuel's freebies BEFORE new: {:?}", report.samuel_freebies_before);
    println!("Samuel's freebies AFTER new: {:?}", report.samuel_freebies_after);
    println!("New freebie details: {}", report.new_freebie_details);
    println!("{}", rule);

    println!("\n--- Testing Company.oldest_company() ---");
    match &report.oldest_company {
        Some(oldest) => println!(
            "The oldest company is: {} (founded in {})",
            oldest.name, oldest.founding_year
        ),
        None => println!("No companies found."),
    }
    println!("{}", rule);

    println!("\n--- Testing Dev.received_one() ---");
    println!("Did Happiness receive a 'T-shirt'? {}", report.received_tshirt);
    println!("Did Happiness receive a 'Laptop'? {}", report.received_laptop);
    println!("{}", rule);

    println!("\n--- Testing Dev.give_away() ---");
    println!("Happiness's freebies BEFORE give_away: {:?}", report.happiness_before_give_away);
    println!("Emma's freebies BEFORE give_away: {:?}", report.emma_before_give_away);

    println!("\nAttempting to give away T-shirt (Happiness owns it):");
    println!("{}", report.owned_give_away.message());
    println!("Happiness's freebies AFTER give_away: {:?}", report.happiness_after_give_away);
    println!("Emma's freebies AFTER give_away: {:?}", report.emma_after_give_away);
    println!("T-Shirt's current owner: {}", report.tshirt_owner_after);

    println!("\nAttempting to give away Sticker Pack (Happiness DOES NOT own it):");
    println!("{}", report.foreign_give_away.message());
    println!("Sticker Pack's current owner: {}", report.sticker_owner_after);
    println!("Happiness's freebies (should be unchanged): {:?}", report.happiness_final);
    println!("Emma's freebies (should be unchanged): {:?}", report.emma_final);
    println!("{}", rule);

    println!("\n--- Debug Session Complete ---");
}
