//! [`Args`] definitions.

use clap::{Parser, Subcommand};

/// Client of the study-partner matching service.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command of the client.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lists partners page by page.
    Partners {
        /// Search term matched against subjects.
        #[arg(short, long, conflicts_with = "sort")]
        search: Option<String>,

        /// Experience level to sort by.
        #[arg(long)]
        sort: Option<String>,

        /// Page number to show.
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Shows the banner of recently created partners.
    Recent,

    /// Shows the top rated partners.
    Top,

    /// Shows details of a single partner.
    Partner {
        /// ID of the partner.
        id: String,

        /// Credentials to sign in with.
        #[command(flatten)]
        auth: Credentials,
    },

    /// Registers a new account.
    Register {
        /// Display name of the account.
        #[arg(long)]
        name: String,

        /// Credentials of the account.
        #[command(flatten)]
        auth: Credentials,

        /// Avatar URL of the account.
        #[arg(long, default_value = "")]
        photo_url: String,
    },

    /// Signs in with the federated identity provider, reading its ID token
    /// from the standard input.
    LoginGoogle,

    /// Lists accepted connections of the account.
    Connections {
        /// Credentials to sign in with.
        #[command(flatten)]
        auth: Credentials,
    },

    /// Updates a connected partner.
    Update {
        /// ID of the connected partner.
        id: String,

        /// New name.
        #[arg(long)]
        name: String,

        /// New subject.
        #[arg(long)]
        subject: String,

        /// New study mode.
        #[arg(long)]
        study_mode: String,

        /// New picture URL.
        #[arg(long, default_value = "")]
        image_url: String,

        /// Credentials to sign in with.
        #[command(flatten)]
        auth: Credentials,
    },

    /// Deletes a connected partner.
    Delete {
        /// ID of the connected partner.
        id: String,

        /// Credentials to sign in with.
        #[command(flatten)]
        auth: Credentials,
    },

    /// Creates a new partner profile.
    Create {
        /// Raw profile fields.
        #[command(flatten)]
        profile: Profile,

        /// Credentials to sign in with.
        #[command(flatten)]
        auth: Credentials,
    },
}

/// Credentials to sign in with.
#[derive(Debug, clap::Args)]
pub struct Credentials {
    /// Email of the account.
    #[arg(long, env = "PARTNERS_EMAIL", default_value = "")]
    pub email: String,

    /// Password of the account.
    #[arg(
        long,
        env = "PARTNERS_PASSWORD",
        hide_env_values = true,
        default_value = ""
    )]
    pub password: String,
}

/// Raw fields of a new partner profile.
#[derive(Debug, clap::Args)]
pub struct Profile {
    /// Name of the partner.
    #[arg(long, default_value = "")]
    pub name: String,

    /// Photo URL of the partner.
    #[arg(long, default_value = "")]
    pub photo_url: String,

    /// Biography of the partner.
    #[arg(long, default_value = "")]
    pub bio: String,

    /// Subject of the partner.
    #[arg(long, default_value = "")]
    pub subject: String,

    /// Preferred study mode of the partner.
    #[arg(long, default_value = "")]
    pub study_mode: String,

    /// Availability of the partner.
    #[arg(long, default_value = "")]
    pub availability: String,

    /// Location of the partner.
    #[arg(long, default_value = "")]
    pub location: String,

    /// Experience level of the partner.
    #[arg(long, default_value = "")]
    pub experience: String,

    /// Self-assessed rating of the partner.
    #[arg(long, default_value = "")]
    pub rating: String,
}
