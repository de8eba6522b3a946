//! Admin moderation subcommands.

use clap::{Subcommand, ValueEnum};
use miette::Result;

use echovault_api::{RequestDecision, RequestStatus, VaultClient, filter_requests};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Approved,
    Denied,
}

impl From<StatusArg> for RequestStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => RequestStatus::Pending,
            StatusArg::Approved => RequestStatus::Approved,
            StatusArg::Denied => RequestStatus::Denied,
        }
    }
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List access requests in the moderation queue
    Requests {
        /// Only show requests with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Approve or deny an access request
    Resolve {
        /// Request id
        id: String,

        /// Approve the request
        #[arg(long, conflicts_with = "deny")]
        approve: bool,

        /// Deny the request
        #[arg(long)]
        deny: bool,

        /// Note recorded with the decision
        #[arg(long)]
        note: Option<String>,
    },

    /// List user accounts
    Users,

    /// Suspend a user account
    Suspend {
        /// User id
        id: String,

        /// Lift the suspension instead
        #[arg(long)]
        reinstate: bool,
    },

    /// List audit log entries
    Logs,

    /// List digital wills
    Wills,
}

pub async fn run(client: &VaultClient, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Requests { status } => {
            let requests = client
                .list_requests()
                .await
                .map_err(|e| miette::miette!("{}", e))?;

            for request in filter_requests(&requests, status.map(Into::into)) {
                println!(
                    "{}  {}  {}  {:?}",
                    request.id, request.user_id, request.kind, request.status
                );
            }
            Ok(())
        }

        AdminCommand::Resolve {
            id,
            approve,
            deny,
            note,
        } => {
            if approve == deny {
                return Err(miette::miette!("pass exactly one of --approve or --deny"));
            }

            let resolved = client
                .resolve_request(&id, &RequestDecision { approve, note })
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("request {} is now {:?}", resolved.id, resolved.status);
            Ok(())
        }

        AdminCommand::Users => {
            let users = client
                .list_users()
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            for user in users {
                println!(
                    "{}  {}  {:?}{}",
                    user.id,
                    user.email,
                    user.role,
                    if user.suspended { "  [suspended]" } else { "" }
                );
            }
            Ok(())
        }

        AdminCommand::Suspend { id, reinstate } => {
            let user = client
                .set_user_suspended(&id, !reinstate)
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!(
                "user {} {}",
                user.id,
                if user.suspended { "suspended" } else { "reinstated" }
            );
            Ok(())
        }

        AdminCommand::Logs => {
            let logs = client
                .list_logs()
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            for entry in logs {
                println!(
                    "{}  {}  {}  {}",
                    entry.at,
                    entry.actor,
                    entry.action,
                    entry.target.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }

        AdminCommand::Wills => {
            let wills = client
                .list_wills()
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            for will in wills {
                println!(
                    "{}  {}  {:?}  updated {}",
                    will.id, will.title, will.status, will.updated_at
                );
            }
            Ok(())
        }
    }
}
