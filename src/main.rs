mod cache;
mod config;
mod directory;
mod error;
mod store;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use directory::client::DirectoryClient;
use directory::service::DirectoryService;
use directory::types::{Address, User, UserPatch};
use store::JsonFileStore;

#[derive(Parser, Debug)]
#[command(name = "userctl")]
#[command(about = "Manage records in a remote user directory, with local overrides")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/userctl/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List all users, remote records merged with local changes
  List,
  /// Show a single user
  Get { id: String },
  /// Create a user locally
  Add {
    #[arg(long)]
    name: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
  },
  /// Edit a user; unset flags keep their current value
  Edit {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
  },
  /// Delete a user locally (remote records get a persisted tombstone)
  Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref())?;

  let remote = DirectoryClient::new(&config)?;
  let store = match &config.overrides_path {
    Some(path) => JsonFileStore::at(path),
    None => JsonFileStore::open()?,
  };
  let service = DirectoryService::new(remote, store);

  match args.command {
    Command::List => {
      let users = service.list_users().await?;
      print_user_table(&users);
    }
    Command::Get { id } => {
      let user = service.get_user(&id).await?;
      print_user(&user);
    }
    Command::Add {
      name,
      username,
      email,
      phone,
      website,
      street,
      city,
    } => {
      let fields = UserPatch {
        name: Some(name),
        username: Some(username),
        email: Some(email),
        phone,
        website,
        address: address_patch(street, city),
      };
      let user = service.add_user(fields).await?;
      println!("created {}", user.id);
    }
    Command::Edit {
      id,
      name,
      username,
      email,
      phone,
      website,
      street,
      city,
    } => {
      let fields = UserPatch {
        name,
        username,
        email,
        phone,
        website,
        address: address_patch(street, city),
      };
      if fields.is_empty() {
        return Err(eyre!("nothing to change: pass at least one field flag"));
      }
      service.update_user(&id, fields).await?;
      println!("updated {id}");
    }
    Command::Delete { id } => {
      service.delete_user(&id).await?;
      println!("deleted {id}");
    }
  }

  Ok(())
}

/// Giving either address flag replaces the stored address wholesale.
fn address_patch(street: Option<String>, city: Option<String>) -> Option<Address> {
  if street.is_none() && city.is_none() {
    return None;
  }
  Some(Address {
    street: street.unwrap_or_default(),
    city: city.unwrap_or_default(),
  })
}

fn print_user_table(users: &[User]) {
  println!(
    "{:<38} {:<24} {:<16} {}",
    "ID", "NAME", "USERNAME", "EMAIL"
  );
  for user in users {
    println!(
      "{:<38} {:<24} {:<16} {}",
      user.id, user.name, user.username, user.email
    );
  }
}

fn print_user(user: &User) {
  println!("id:       {}", user.id);
  println!("name:     {}", user.name);
  println!("username: {}", user.username);
  println!("email:    {}", user.email);
  println!("phone:    {}", user.phone);
  println!("website:  {}", user.website);
  println!("address:  {}, {}", user.address.street, user.address.city);
}
