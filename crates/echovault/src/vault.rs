//! User-facing list subcommands: contacts, notes, scheduled, stats.

use clap::Subcommand;
use miette::Result;

use echovault_api::{ContactUpsert, VaultClient, filter_contacts, paginate};

#[derive(Subcommand)]
pub enum ContactsCommand {
    /// List saved contacts
    List {
        /// Filter by name, email, or phone substring
        #[arg(long)]
        query: Option<String>,

        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Contacts per page
        #[arg(long, default_value = "20")]
        per_page: usize,
    },

    /// Add a contact
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        relationship: Option<String>,
    },

    /// Update a contact (all fields are replaced)
    Edit {
        /// Contact id
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        relationship: Option<String>,
    },

    /// Remove a contact
    Remove {
        /// Contact id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum NotesCommand {
    /// List recorded voice notes
    List,

    /// Show one voice note
    Show {
        /// Voice note id
        id: String,
    },

    /// Print a short-lived download URL for a voice note
    Url {
        /// Voice note id
        id: String,
    },

    /// Delete a voice note
    Remove {
        /// Voice note id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ScheduledCommand {
    /// List scheduled deliveries
    List,

    /// Cancel a scheduled delivery
    Cancel {
        /// Scheduled message id
        id: String,
    },
}

pub async fn run_contacts(client: &VaultClient, command: ContactsCommand) -> Result<()> {
    match command {
        ContactsCommand::List {
            query,
            page,
            per_page,
        } => {
            let contacts = client
                .list_contacts()
                .await
                .map_err(|e| miette::miette!("{}", e))?;

            let filtered: Vec<_> = filter_contacts(&contacts, query.as_deref().unwrap_or(""))
                .into_iter()
                .cloned()
                .collect();
            let page = paginate(&filtered, page, per_page);

            for contact in &page.items {
                println!(
                    "{}  {}  {}  {}",
                    contact.id,
                    contact.name,
                    contact.email.as_deref().unwrap_or("-"),
                    contact.phone.as_deref().unwrap_or("-"),
                );
            }
            println!(
                "page {}/{} ({} contact(s))",
                page.page, page.total_pages, page.total_items
            );
            Ok(())
        }

        ContactsCommand::Add {
            name,
            email,
            phone,
            relationship,
        } => {
            let created = client
                .create_contact(&ContactUpsert {
                    name,
                    email,
                    phone,
                    relationship,
                })
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("created contact {}", created.id);
            Ok(())
        }

        ContactsCommand::Edit {
            id,
            name,
            email,
            phone,
            relationship,
        } => {
            let updated = client
                .update_contact(
                    &id,
                    &ContactUpsert {
                        name,
                        email,
                        phone,
                        relationship,
                    },
                )
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("updated contact {}", updated.id);
            Ok(())
        }

        ContactsCommand::Remove { id } => {
            client
                .delete_contact(&id)
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("removed contact {}", id);
            Ok(())
        }
    }
}

pub async fn run_notes(client: &VaultClient, command: NotesCommand) -> Result<()> {
    match command {
        NotesCommand::List => {
            let notes = client
                .list_voice_notes()
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            for note in notes {
                println!(
                    "{}  {}  {}s  {} bytes",
                    note.id, note.title, note.duration_secs, note.size_bytes
                );
            }
            Ok(())
        }

        NotesCommand::Show { id } => {
            let note = client
                .get_voice_note(&id)
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("id:       {}", note.id);
            println!("title:    {}", note.title);
            println!("duration: {}s", note.duration_secs);
            println!("size:     {} bytes", note.size_bytes);
            println!("recorded: {}", note.created_at);
            Ok(())
        }

        NotesCommand::Url { id } => {
            let url = client
                .voice_note_download_url(&id)
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("{}", url);
            Ok(())
        }

        NotesCommand::Remove { id } => {
            client
                .delete_voice_note(&id)
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("removed voice note {}", id);
            Ok(())
        }
    }
}

pub async fn run_scheduled(client: &VaultClient, command: ScheduledCommand) -> Result<()> {
    match command {
        ScheduledCommand::List => {
            let scheduled = client
                .list_scheduled()
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            for message in scheduled {
                println!(
                    "{}  {}  {:?}  note={}",
                    message.id, message.scheduled_for, message.status, message.voice_note_id
                );
            }
            Ok(())
        }

        ScheduledCommand::Cancel { id } => {
            client
                .cancel_scheduled(&id)
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("cancelled {}", id);
            Ok(())
        }
    }
}

pub async fn run_stats(client: &VaultClient) -> Result<()> {
    let stats = client
        .get_stats()
        .await
        .map_err(|e| miette::miette!("{}", e))?;

    println!("contacts:          {}", stats.total_contacts);
    println!("voice notes:       {}", stats.total_voice_notes);
    println!("pending deliveries: {}", stats.pending_scheduled);
    println!(
        "storage:           {} / {} bytes",
        stats.storage_used_bytes, stats.storage_limit_bytes
    );
    Ok(())
}
