//! User management CLI commands (admin only)

use clap::Subcommand;

use crate::display::{format_user_details, format_user_list};
use crate::error::CommitmentResult;
use crate::models::{UserRole, UserStatus, UserUpdate};
use crate::services::auth::AuthService;
use crate::services::password::{
    check_password_strength, generate_password, DEFAULT_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
use crate::services::users::{NewUser, UserService};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user account
    Create {
        username: String,
        email: String,
        /// Password (generated when omitted)
        #[arg(short, long)]
        password: Option<String>,
        #[arg(long, default_value = "")]
        budget_user_id: String,
        #[arg(long, default_value = "")]
        treasury: String,
        #[arg(long, value_enum, default_value = "user")]
        role: UserRole,
        #[arg(long, value_enum, default_value = "active")]
        status: UserStatus,
    },
    /// List all users
    List,
    /// Show user details
    Show {
        /// Username or ID
        user: String,
    },
    /// Update user fields
    Update {
        /// Username or ID
        user: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        budget_user_id: Option<String>,
        #[arg(long)]
        treasury: Option<String>,
        #[arg(long, value_enum)]
        role: Option<UserRole>,
        /// Name printed on generated documents (empty clears it)
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Allow a user to log in
    Activate {
        user: String,
    },
    /// Block a user from logging in
    Suspend {
        user: String,
    },
    /// Delete a user account
    Delete {
        user: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Print a random password
    GenPassword {
        #[arg(short, long, default_value_t = DEFAULT_PASSWORD_LENGTH)]
        length: usize,
    },
}

pub fn handle_user_command(storage: &Storage, cmd: UserCommands) -> CommitmentResult<()> {
    if let UserCommands::GenPassword { length } = cmd {
        println!("{}", generate_password(length));
        return Ok(());
    }

    AuthService::new(storage).require_admin()?;
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Create {
            username,
            email,
            password,
            budget_user_id,
            treasury,
            role,
            status,
        } => {
            let created = service.create(NewUser {
                username,
                email,
                password,
                budget_user_id,
                treasury,
                role,
                status,
            })?;

            println!("Created user: {}", created.user.username);
            println!("  Email: {}", created.user.email);
            println!("  ID: {}", created.user.id);
            if created.generated {
                println!("  Password: {}", created.password);
            }
            let strength = check_password_strength(&created.password);
            if !strength.is_strong() {
                println!(
                    "  Warning: weak password (min {} chars with upper, lower and digit)",
                    MIN_PASSWORD_LENGTH
                );
            }
            if created.notified {
                println!("  Welcome notice sent to {}", created.user.email);
            }
        }

        UserCommands::List => {
            print!("{}", format_user_list(&service.list()?));
        }

        UserCommands::Show { user } => {
            print!("{}", format_user_details(&service.find(&user)?));
        }

        UserCommands::Update {
            user,
            username,
            email,
            password,
            budget_user_id,
            treasury,
            role,
            display_name,
        } => {
            let update = UserUpdate {
                username,
                email,
                password,
                budget_user_id,
                treasury,
                role,
                status: None,
                pdf_display_name: display_name,
            };
            if update.is_empty() {
                println!("No changes specified. Use --help to see the user fields.");
                return Ok(());
            }
            let updated = service.update(&user, &update)?;
            println!("Updated user: {}", updated.username);
        }

        UserCommands::Activate { user } => {
            let updated = service.set_status(&user, UserStatus::Active)?;
            println!("Activated user: {}", updated.username);
        }

        UserCommands::Suspend { user } => {
            let updated = service.set_status(&user, UserStatus::Suspended)?;
            println!("Suspended user: {}", updated.username);
        }

        UserCommands::Delete { user, force } => {
            let found = service.find(&user)?;
            if !force {
                println!("This will delete user {}.", found.username);
                println!("To proceed, run again with --force flag:");
                println!("  commitments user delete {} --force", user);
                return Ok(());
            }
            let deleted = service.delete(&user)?;
            println!("Deleted user: {}", deleted.username);
        }

        UserCommands::GenPassword { .. } => {}
    }

    Ok(())
}
