//! CLI inspector for save data directories.
//!
//! Reads only through the manager: bound method and encryption state,
//! resolved save path, file listing, single-file deletion and folder wipe.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use saveload_core::storage::paths::{DEFAULT_BASE_FOLDER, DEFAULT_SUB_FOLDER};
use saveload_core::{SaveLoadConfig, SaveLoadManager, SerializationMethod};

/// Command-line arguments for the save data inspector.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Writable data root (defaults to the platform data directory)
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Read-only bundle root (defaults to the assets directory next to the executable)
    #[arg(long)]
    bundle_root: Option<PathBuf>,

    /// Base folder under the root
    #[arg(long, default_value = DEFAULT_BASE_FOLDER)]
    base_folder: String,

    /// Default sub-folder for saved files
    #[arg(long, default_value = DEFAULT_SUB_FOLDER)]
    folder: String,

    /// Serialization method: binary, text, binary-encrypted, text-encrypted, custom
    #[arg(long, default_value = "text")]
    method: SerializationMethod,

    /// Encryption key for encrypted methods
    #[arg(long, default_value = "")]
    key: String,

    /// Encryption salt for encrypted methods
    #[arg(long, default_value = "")]
    salt: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the bound method, encryption state and resolved save path
    Info,
    /// List saved files by bare name
    List {
        /// Sub-folder to list instead of the default
        #[arg(long)]
        folder: Option<String>,
        /// Only include files with this extension
        #[arg(long)]
        extension: Option<String>,
        /// List the read-only bundled assets instead
        #[arg(long)]
        bundled: bool,
    },
    /// Check whether a saved file exists
    Exists {
        filename: String,
        /// Sub-folder containing the file
        #[arg(long)]
        folder: Option<String>,
    },
    /// Delete a saved file
    Delete {
        filename: String,
        /// Sub-folder containing the file
        #[arg(long)]
        folder: Option<String>,
    },
    /// Remove a save folder and everything in it
    Wipe {
        /// Sub-folder to remove instead of the default
        #[arg(long)]
        folder: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let defaults = SaveLoadConfig::default();
    let manager = SaveLoadManager::new(SaveLoadConfig {
        data_root: args.data_root.unwrap_or(defaults.data_root),
        bundle_root: args.bundle_root.unwrap_or(defaults.bundle_root),
        base_folder: args.base_folder,
        default_folder: args.folder,
        method: args.method,
        key: args.key,
        salt: args.salt,
    });

    match args.command {
        Command::Info => {
            println!("method:      {}", manager.method());
            println!("encrypted:   {}", manager.is_encrypted());
            println!(
                "credentials: {}",
                if manager.has_credentials() {
                    "present"
                } else {
                    "absent"
                }
            );
            println!("save path:   {}", manager.default_save_path().display());
            if manager.is_encrypted() && !manager.has_credentials() {
                eprintln!("warning: encrypted method without key/salt; saves and loads will fail");
            }
        }
        Command::List {
            folder,
            extension,
            bundled,
        } => {
            let files = if bundled {
                manager.list_bundled_files(folder.as_deref(), extension.as_deref())
            } else {
                manager.list_files(folder.as_deref(), extension.as_deref())
            };
            for file in files {
                println!("{file}");
            }
        }
        Command::Exists { filename, folder } => {
            println!("{}", manager.exists(&filename, folder.as_deref()));
        }
        Command::Delete { filename, folder } => {
            manager.delete(&filename, folder.as_deref())?;
        }
        Command::Wipe { folder } => {
            manager.delete_all(folder.as_deref())?;
        }
    }

    Ok(())
}
