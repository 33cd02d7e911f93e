use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::{Capabilities, Did},
    protocol::format_price,
};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/admin.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateUser {
        did: String,
        name: String,
        #[arg(long)]
        lab: bool,
        #[arg(long)]
        admin: bool,
    },
    /// Adds capabilities to an existing user; flags not passed are kept.
    Grant {
        did: String,
        #[arg(long)]
        lab: bool,
        #[arg(long)]
        admin: bool,
    },
    AddPizza {
        name: String,
        price_cents: i64,
    },
    ListPizzas,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url)
        .await
        .with_context(|| format!("failed to open {}", cli.database_url))?;

    match cli.command {
        Command::CreateUser {
            did,
            name,
            lab,
            admin,
        } => {
            let did = Did::new(did);
            let user_id = storage.create_user(&did, &name).await?;
            storage
                .set_capabilities(&did, Capabilities { lab, admin })
                .await?;
            println!("created user_id={} did={did} lab={lab} admin={admin}", user_id.0);
        }
        Command::Grant { did, lab, admin } => {
            let did = Did::new(did);
            let Some(user) = storage.find_user_by_did(&did).await? else {
                bail!("no user with did {did}");
            };
            let capabilities = Capabilities {
                lab: user.capabilities.lab || lab,
                admin: user.capabilities.admin || admin,
            };
            storage.set_capabilities(&did, capabilities).await?;
            println!(
                "updated did={did} lab={} admin={}",
                capabilities.lab, capabilities.admin
            );
        }
        Command::AddPizza { name, price_cents } => {
            if price_cents < 0 {
                bail!("price must not be negative");
            }
            let uuid = storage.create_pizza(&name, price_cents).await?;
            println!("created pizza uuid={uuid}");
        }
        Command::ListPizzas => {
            for pizza in storage.list_pizzas().await? {
                println!(
                    "{}  {} ({})",
                    pizza.uuid,
                    pizza.name,
                    format_price(pizza.price_cents)
                );
            }
        }
    }

    Ok(())
}
