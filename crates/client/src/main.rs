//! daybook CLI entry point.

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use daybook_client::cli::events::EventsAction;
use daybook_client::cli::view::ViewArgs;
use daybook_client::cli::{Cli, Commands, OutputFormat};
use daybook_client::output::{format_output, pretty};
use daybook_client::{
    offline, ClientConfig, FileSession, HttpRemote, MemorySession, ScheduleController,
    ScheduleError, ScheduleRemote, Session, SessionProvider,
};
use daybook_core::calendar::{Category, EventDraft, EventId, EventPatch, RecurrencePattern};
use daybook_core::grid::CalendarView;

const OFFLINE_OWNER: &str = "local";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daybook=info,daybook_client=info,daybook_core=warn".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    let file_session = Arc::new(FileSession::new(&config.session_file));

    match &cli.command {
        Commands::Login(args) => {
            file_session
                .save(&Session::new(&args.owner, &args.token))
                .with_context(|| format!("writing {}", config.session_file.display()))?;
            if !cli.quiet {
                println!("Logged in as {}", args.owner);
            }
            return Ok(());
        }
        Commands::Logout => {
            file_session
                .clear()
                .with_context(|| format!("removing {}", config.session_file.display()))?;
            if !cli.quiet {
                println!("Logged out");
            }
            return Ok(());
        }
        _ => {}
    }

    if cli.offline {
        let remote = offline::open(&config.offline_file)?;
        let session = file_session
            .session()
            .unwrap_or_else(|| Session::new(OFFLINE_OWNER, "offline"));
        let controller =
            ScheduleController::new(remote.clone(), Arc::new(MemorySession::new(session)))
                .with_options(config.grid_options());

        let outcome = run(&cli, &controller).await;
        offline::save(&config.offline_file, &remote).await?;
        outcome
    } else {
        let session: Arc<dyn SessionProvider> = file_session;
        let remote = HttpRemote::new(&config, session.clone())?;
        tracing::debug!(url = remote.collection_url(), "Using remote store");
        let controller =
            ScheduleController::new(remote, session).with_options(config.grid_options());

        run(&cli, &controller).await
    }
}

async fn run<R: ScheduleRemote>(cli: &Cli, controller: &ScheduleController<R>) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Month(args) => show_grid(cli, controller, CalendarView::Month, args).await,
        Commands::Week(args) => show_grid(cli, controller, CalendarView::Week, args).await,
        Commands::Day(args) => show_grid(cli, controller, CalendarView::Day, args).await,
        Commands::Events(events_cmd) => run_events(cli, controller, &events_cmd.action).await,
        Commands::Login(_) | Commands::Logout => Ok(()),
    }
}

async fn show_grid<R: ScheduleRemote>(
    cli: &Cli,
    controller: &ScheduleController<R>,
    view: CalendarView,
    args: &ViewArgs,
) -> anyhow::Result<()> {
    controller
        .set_category_filter(args.category.map(Category::from))
        .await;
    let moved = match args.date {
        Some(date) => controller.go_to(view, date).await,
        None => controller.set_view(view).await,
    };
    moved.map_err(explain)?;

    let grid = controller.grid().await;
    match cli.format {
        OutputFormat::Json => println!("{}", format_output(&grid, cli.format)),
        OutputFormat::Pretty => println!("{}", pretty::format_grid(&grid)),
    }
    Ok(())
}

/// Loads the day window around `date` so the event is in the working set.
async fn load_day<R: ScheduleRemote>(
    controller: &ScheduleController<R>,
    date: NaiveDate,
) -> anyhow::Result<()> {
    controller
        .go_to(CalendarView::Day, date)
        .await
        .map_err(explain)?;
    Ok(())
}

async fn run_events<R: ScheduleRemote>(
    cli: &Cli,
    controller: &ScheduleController<R>,
    action: &EventsAction,
) -> anyhow::Result<()> {
    match action {
        EventsAction::List {
            date,
            month,
            category,
        } => {
            controller
                .set_category_filter(category.map(Category::from))
                .await;
            let events = match month {
                Some((year, month)) => {
                    let first = NaiveDate::from_ymd_opt(*year, *month, 1)
                        .with_context(|| format!("invalid month {year}-{month:02}"))?;
                    controller
                        .go_to(CalendarView::Month, first)
                        .await
                        .map_err(explain)?;
                    controller.events_for_month(*year, *month).await?
                }
                None => {
                    let day = match date {
                        Some(day) => *day,
                        None => controller.snapshot().state.current_date,
                    };
                    load_day(controller, day).await?;
                    controller.events_for_date(day).await
                }
            };
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&events, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_events(&events)),
            }
        }
        EventsAction::Create {
            title,
            date,
            end_date,
            start_time,
            end_time,
            category,
            priority,
            description,
            location,
            attendees,
            color,
            repeat,
            until,
        } => {
            let mut draft = match (start_time, end_time) {
                (Some(start), Some(end)) => EventDraft::timed("", title, *date, *start, *end),
                _ => EventDraft::all_day("", title, *date),
            };
            if let Some(end) = end_date {
                draft.end_date = *end;
            }
            if let Some(category) = category {
                draft = draft.with_category((*category).into());
            }
            if let Some(priority) = priority {
                draft = draft.with_priority((*priority).into());
            }
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            if let Some(location) = location {
                draft = draft.with_location(location);
            }
            if let Some(color) = color {
                draft = draft.with_color(color);
            }
            if !attendees.is_empty() {
                draft = draft.with_attendees(attendees.iter().map(|a| a.trim()));
            }
            if let Some(repeat) = repeat {
                let pattern = RecurrencePattern::from(*repeat);
                if pattern != RecurrencePattern::None {
                    draft = draft.with_recurrence(pattern, *until);
                }
            }

            let event = controller.add_event(draft).await.map_err(explain)?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&event, cli.format)),
                OutputFormat::Pretty => println!("Created:\n{}", pretty::format_event(&event)),
            }
        }
        EventsAction::Update {
            id,
            on,
            title,
            date,
            end_date,
            start_time,
            end_time,
            all_day,
            category,
            priority,
            description,
            location,
            color,
            repeat,
            until,
        } => {
            let mut patch = EventPatch::new();
            patch.title = title.clone();
            patch.description = description.clone();
            patch.location = location.clone();
            patch.color = color.clone();
            patch.start_date = *date;
            patch.end_date = *end_date;
            patch.category = category.map(Into::into);
            patch.priority = priority.map(Into::into);
            if let (Some(start), Some(end)) = (start_time, end_time) {
                patch = patch.with_times(*start, *end);
            }
            if *all_day {
                patch = patch.with_all_day();
            }
            if let Some(repeat) = repeat {
                patch = patch.with_recurrence((*repeat).into(), *until);
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update; pass at least one field to change");
            }

            load_day(controller, *on).await?;
            let event = controller
                .update_event(&EventId::from(id.as_str()), patch)
                .await
                .map_err(explain)?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&event, cli.format)),
                OutputFormat::Pretty => println!("Updated:\n{}", pretty::format_event(&event)),
            }
        }
        EventsAction::Delete { id, on } => {
            load_day(controller, *on).await?;
            controller
                .delete_event(&EventId::from(id.as_str()))
                .await
                .map_err(explain)?;
            if !cli.quiet {
                println!("Deleted event {}", id);
            }
        }
    }
    Ok(())
}

/// Adds a hint to session failures.
fn explain(err: ScheduleError) -> anyhow::Error {
    if err.is_session_invalid() {
        anyhow::anyhow!("{err}. Run `daybook login --owner <id> --token <token>` first.")
    } else {
        err.into()
    }
}
