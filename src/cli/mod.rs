mod add;
pub mod report;

use std::path::Path;

use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, Subcommand};
use log::{debug, warn};

use crate::config::Config;
use crate::services::{
    Advisor, Currency, GeminiClient, JsonFileStore, SessionService, SubscriptionLedger,
    SubscriptionStore,
};
use crate::types::{
    Category, CategorySet, Notice, NoticeKind, Profile, SubsleuthError, DEFAULT_CATEGORIES,
};

pub use add::AddArgs;

/// Track subscription spend and find ways to cut it
#[derive(Parser)]
#[command(name = "subsleuth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in (creates the account on first use)
    Login {
        email: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Show or update your profile
    Profile {
        /// Set your full name
        #[arg(long)]
        name: Option<String>,
    },

    /// Track a new subscription
    Add(AddArgs),

    /// Stop tracking a subscription
    Remove {
        /// Subscription id (see `list`)
        id: String,
    },

    /// List tracked subscriptions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show spend dashboard (default)
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage custom categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Generate a cancellation guide for a service
    Guide {
        service: String,
    },

    /// Suggest cheaper alternatives to a service
    Deals {
        service: String,

        /// Currency for price estimates (defaults to configured currency)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Show or set the display currency
    Currency {
        /// ISO code, e.g. EUR
        code: Option<String>,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List default and custom categories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a custom category
    Add {
        name: String,
    },

    /// Delete a custom category
    Remove {
        id: String,
    },
}

impl Cli {
    /// `config_path` is where `currency <CODE>` saves its choice
    pub fn run(self, config: Config, config_path: &Path) -> anyhow::Result<()> {
        let store = JsonFileStore::new(&config.data_dir);
        let sessions = SessionService::new(&config.data_dir);
        let currency = config.currency();
        debug!("data dir: {}", config.data_dir.display());

        match self.command {
            Some(Commands::Login { email }) => {
                let session = sessions.sign_in(&email)?;
                println!("Signed in as {}", session.email);
                Ok(())
            }
            Some(Commands::Logout) => {
                sessions.sign_out()?;
                println!("Signed out");
                Ok(())
            }
            Some(Commands::Whoami) => {
                match sessions.current() {
                    Some(s) => println!("{} ({})", s.email, s.user_id),
                    None => println!("Not signed in"),
                }
                Ok(())
            }
            Some(Commands::Profile { name: None }) => {
                let session = sessions.require()?;
                let profile = store.get_profile(&session.user_id)?;
                print!("{}", report::render_profile(&session, profile.as_ref()));
                Ok(())
            }
            Some(Commands::Profile { name: Some(name) }) => {
                let session = sessions.require()?;
                let notice = match store.save_profile(&session.user_id, &Profile::new(&name)) {
                    Ok(()) => Notice::success("Profile updated successfully"),
                    Err(e) => {
                        warn!("profile save failed: {}", e);
                        Notice::error("Error updating profile")
                    }
                };
                report_writes(vec![notice])
            }
            Some(Commands::Add(args)) => {
                let session = sessions.require()?;
                let categories = store.list_categories(&session.user_id)?;
                let sub = args
                    .to_new_subscription(Local::now().date_naive())?
                    .validate(&CategorySet::new(&categories))?;

                let mut ledger = SubscriptionLedger::new(store.list_subscriptions(&session.user_id)?);
                ledger.add(sub);
                report_writes(ledger.flush(&store, &session.user_id))
            }
            Some(Commands::Remove { id }) => {
                let session = sessions.require()?;
                let mut ledger = SubscriptionLedger::new(store.list_subscriptions(&session.user_id)?);
                if ledger.remove(&id).is_none() {
                    return Err(SubsleuthError::NotFound(format!("subscription {}", id)).into());
                }
                report_writes(ledger.flush(&store, &session.user_id))
            }
            Some(Commands::List { json }) => {
                let session = sessions.require()?;
                let subs = store.list_subscriptions(&session.user_id)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&subs)?);
                } else {
                    print!("{}", report::render_list(&subs, &currency));
                }
                Ok(())
            }
            None | Some(Commands::Summary { json: false }) => {
                let session = sessions.require()?;
                let ledger = SubscriptionLedger::new(store.list_subscriptions(&session.user_id)?);
                let today = Local::now().date_naive();
                print!("{}", report::render_summary(&ledger.summary(), &currency, today));
                Ok(())
            }
            Some(Commands::Summary { json: true }) => {
                let session = sessions.require()?;
                let ledger = SubscriptionLedger::new(store.list_subscriptions(&session.user_id)?);
                println!("{}", serde_json::to_string_pretty(&ledger.summary())?);
                Ok(())
            }
            Some(Commands::Categories { command }) => {
                let session = sessions.require()?;
                run_categories(command, &store, &session.user_id)
            }
            Some(Commands::Guide { service }) => {
                let advisor = Advisor::new(GeminiClient::new(config.api_key, Some(config.model))?);
                let runtime = tokio::runtime::Runtime::new()?;
                let guide = runtime.block_on(advisor.cancellation_guide(&service))?;
                println!("{}", guide);
                Ok(())
            }
            Some(Commands::Deals { service, currency: code }) => {
                let code = match code {
                    Some(c) => Currency::find(&c)
                        .with_context(|| format!("unsupported currency '{}'", c))?
                        .code,
                    None => currency.code,
                };
                let advisor = Advisor::new(GeminiClient::new(config.api_key, Some(config.model))?);
                let runtime = tokio::runtime::Runtime::new()?;
                let alternatives = runtime.block_on(advisor.alternatives(&service, code))?;
                print!("{}", report::render_alternatives(&service, &alternatives));
                Ok(())
            }
            Some(Commands::Currency { code: None }) => {
                println!("{} ({}) - {}", currency.code, currency.symbol, currency.label);
                Ok(())
            }
            Some(Commands::Currency { code: Some(code) }) => {
                let chosen = Currency::find(&code)
                    .with_context(|| format!("unsupported currency '{}'", code))?;
                let mut saved = Config::from_file(config_path)?;
                saved.currency = chosen.code.to_string();
                saved.save(config_path)?;
                println!("Currency set to {} ({})", chosen.code, chosen.symbol);
                Ok(())
            }
        }
    }
}

fn run_categories(
    command: CategoryCommands,
    store: &JsonFileStore,
    user_id: &str,
) -> anyhow::Result<()> {
    match command {
        CategoryCommands::List { json } => {
            let custom = store.list_categories(user_id)?;
            if json {
                let names = CategorySet::new(&custom);
                println!("{}", serde_json::to_string_pretty(names.names())?);
            } else {
                print!("{}", report::render_categories(&DEFAULT_CATEGORIES, &custom));
            }
            Ok(())
        }
        CategoryCommands::Add { name } => {
            let existing = store.list_categories(user_id)?;
            let name = CategorySet::new(&existing).check_new(&name)?;
            store.create_category(user_id, &Category::new(name.clone()))?;
            println!("Category '{}' added", name);
            Ok(())
        }
        CategoryCommands::Remove { id } => {
            store.delete_category(user_id, &id)?;
            println!("Category removed");
            Ok(())
        }
    }
}

/// Print write notices; any failed write makes the command fail
fn report_writes(notices: Vec<Notice>) -> anyhow::Result<()> {
    let mut failed = 0;
    for notice in &notices {
        if notice.kind == NoticeKind::Error {
            failed += 1;
            eprintln!("{}", report::render_notice(notice));
        } else {
            println!("{}", report::render_notice(notice));
        }
    }
    if failed > 0 {
        bail!("{} write(s) failed; local view may differ from saved data", failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BillingCycle;
    use tempfile::TempDir;

    fn test_config(tmp: &TempDir) -> Config {
        Config {
            data_dir: tmp.path().join("data"),
            ..Config::default()
        }
    }

    fn run_in(tmp: &TempDir, args: &[&str]) -> anyhow::Result<()> {
        let argv = std::iter::once("subsleuth").chain(args.iter().copied());
        Cli::try_parse_from(argv)
            .unwrap()
            .run(test_config(tmp), &tmp.path().join("config.json"))
    }

    fn signed_in_user(tmp: &TempDir) -> String {
        run_in(tmp, &["login", "ada@example.com"]).unwrap();
        SessionService::new(&test_config(tmp).data_dir)
            .current()
            .unwrap()
            .user_id
    }

    fn store_of(tmp: &TempDir) -> JsonFileStore {
        JsonFileStore::new(&test_config(tmp).data_dir)
    }

    fn subsleuth_error(err: &anyhow::Error) -> &SubsleuthError {
        err.downcast_ref::<SubsleuthError>().unwrap()
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["subsleuth"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_summary_json() {
        let cli = Cli::try_parse_from(["subsleuth", "summary", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Summary { json: true })));
    }

    #[test]
    fn test_cli_parse_add_with_defaults() {
        let cli = Cli::try_parse_from(["subsleuth", "add", "Netflix", "15.99"]).unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.name, "Netflix");
                assert_eq!(args.cost, 15.99);
                assert_eq!(args.cycle, BillingCycle::Monthly);
                assert_eq!(args.category, "Streaming");
                assert!(args.renewal.is_none());
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_cli_parse_add_rejects_non_numeric_cost() {
        assert!(Cli::try_parse_from(["subsleuth", "add", "Netflix", "cheap"]).is_err());
    }

    #[test]
    fn test_cli_parse_add_cycle() {
        let cli =
            Cli::try_parse_from(["subsleuth", "add", "Adobe", "600", "--cycle", "Yearly"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Add(ref args)) if args.cycle == BillingCycle::Yearly
        ));
        assert!(
            Cli::try_parse_from(["subsleuth", "add", "Adobe", "600", "--cycle", "weekly"]).is_err()
        );
    }

    #[test]
    fn test_cli_parse_profile() {
        let cli = Cli::try_parse_from(["subsleuth", "profile"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Profile { name: None })));
        let cli = Cli::try_parse_from(["subsleuth", "profile", "--name", "Ada"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Profile { name: Some(ref n) }) if n == "Ada"
        ));
    }

    #[test]
    fn test_cli_parse_deals_currency() {
        let cli =
            Cli::try_parse_from(["subsleuth", "deals", "Spotify", "--currency", "EUR"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Deals { currency: Some(ref c), .. }) if c == "EUR"
        ));
    }

    #[test]
    fn test_cli_parse_categories_add() {
        let cli = Cli::try_parse_from(["subsleuth", "categories", "add", "News"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Categories {
                command: CategoryCommands::Add { ref name }
            }) if name == "News"
        ));
    }

    #[test]
    fn test_report_writes_fails_on_error_notice() {
        assert!(report_writes(vec![Notice::success("Added A")]).is_ok());
        assert!(report_writes(vec![Notice::error("Failed to save A")]).is_err());
    }

    #[test]
    fn test_run_requires_login() {
        let tmp = TempDir::new().unwrap();
        let err = run_in(&tmp, &["add", "Netflix", "15.99"]).unwrap_err();
        assert!(matches!(subsleuth_error(&err), SubsleuthError::Auth(_)));
    }

    #[test]
    fn test_run_add_accepts_custom_category() {
        let tmp = TempDir::new().unwrap();
        let user = signed_in_user(&tmp);

        run_in(&tmp, &["categories", "add", "News"]).unwrap();
        run_in(&tmp, &["add", "Times", "5", "--category", "News"]).unwrap();
        let err = run_in(&tmp, &["add", "Lonely Planet", "8", "--category", "Travel"]).unwrap_err();
        assert!(matches!(subsleuth_error(&err), SubsleuthError::Validation(_)));

        let subs = store_of(&tmp).list_subscriptions(&user).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].name, "Times");
        assert_eq!(subs[0].category, "News");
    }

    #[test]
    fn test_run_remove() {
        let tmp = TempDir::new().unwrap();
        let user = signed_in_user(&tmp);
        run_in(&tmp, &["add", "Netflix", "15.99"]).unwrap();
        let id = store_of(&tmp).list_subscriptions(&user).unwrap()[0].id.clone();

        let err = run_in(&tmp, &["remove", "no-such-id"]).unwrap_err();
        assert!(matches!(subsleuth_error(&err), SubsleuthError::NotFound(_)));
        assert_eq!(store_of(&tmp).list_subscriptions(&user).unwrap().len(), 1);

        run_in(&tmp, &["remove", id.as_str()]).unwrap();
        assert!(store_of(&tmp).list_subscriptions(&user).unwrap().is_empty());
    }

    #[test]
    fn test_run_categories_add_rejects_collision() {
        let tmp = TempDir::new().unwrap();
        let user = signed_in_user(&tmp);

        run_in(&tmp, &["categories", "add", " News "]).unwrap();
        let err = run_in(&tmp, &["categories", "add", "news"]).unwrap_err();
        assert!(matches!(subsleuth_error(&err), SubsleuthError::Validation(_)));
        assert!(run_in(&tmp, &["categories", "add", "gaming"]).is_err());

        let categories = store_of(&tmp).list_categories(&user).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "News");
    }

    #[test]
    fn test_run_currency_persists_choice() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");

        run_in(&tmp, &["currency", "eur"]).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().currency, "EUR");

        assert!(run_in(&tmp, &["currency", "XYZ"]).is_err());
        assert_eq!(Config::from_file(&path).unwrap().currency, "EUR");
    }

    #[test]
    fn test_run_profile_saves_name() {
        let tmp = TempDir::new().unwrap();
        let user = signed_in_user(&tmp);

        run_in(&tmp, &["profile"]).unwrap();
        run_in(&tmp, &["profile", "--name", "Ada Lovelace"]).unwrap();

        let profile = store_of(&tmp).get_profile(&user).unwrap().unwrap();
        assert_eq!(profile.full_name, "Ada Lovelace");
    }
}
