//! Front Desk - terminal front end for the clinic assistant widget
//!
//! Plain lines are sent to the assistant; lines starting with `/` drive the
//! widget (quick replies, ratings, booking calendar). `/help` lists them.

use chrono::{Datelike, NaiveDate};
use front_desk::config::WidgetConfig;
use front_desk::gateway::{HttpGateway, LoggingGateway};
use front_desk::markup;
use front_desk::state_machine::{BookingDraft, ContactField, Stage};
use front_desk::transcript::{rating_acknowledgment, Role, Transcript, Turn};
use front_desk::widget::Widget;
use std::fmt::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Gateway = Arc<LoggingGateway<HttpGateway>>;
type App = Widget<Gateway, Gateway, Gateway>;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

const HELP: &str = "\
Commands:
  <text>            send a message
  /quick <n>        send quick reply n
  /up, /down        rate the latest answer
  /restart          start a new conversation
  /book             open the booking calendar
  /date YYYY-MM-DD  pick a day
  /prev, /next      change month
  /slot <n>         pick a time
  /clear            unpick the time
  /continue, /back  move between steps
  /name, /email, /phone, /reason <value>
  /submit           book the appointment
  /close            close the booking calendar
  /quit";

#[derive(Debug)]
enum Command<'a> {
    Say(&'a str),
    Quick(usize),
    Rate(bool),
    Restart,
    Help,
    Quit,
    Book,
    Close,
    Date(NaiveDate),
    PrevMonth,
    NextMonth,
    Slot(usize),
    ClearSlot,
    Continue,
    Back,
    Field(ContactField, &'a str),
    Submit,
    Invalid(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let Some(command) = line.strip_prefix('/') else {
            return Command::Say(line);
        };
        let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
        let arg = arg.trim();
        match name {
            "quick" => arg
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map_or(Command::Invalid(line), Command::Quick),
            "up" => Command::Rate(true),
            "down" => Command::Rate(false),
            "restart" => Command::Restart,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "book" => Command::Book,
            "close" => Command::Close,
            "date" => NaiveDate::parse_from_str(arg, "%Y-%m-%d")
                .map_or(Command::Invalid(line), Command::Date),
            "prev" => Command::PrevMonth,
            "next" => Command::NextMonth,
            "slot" => arg
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map_or(Command::Invalid(line), Command::Slot),
            "clear" => Command::ClearSlot,
            "continue" => Command::Continue,
            "back" => Command::Back,
            "name" => Command::Field(ContactField::Name, arg),
            "email" => Command::Field(ContactField::Email, arg),
            "phone" => Command::Field(ContactField::Phone, arg),
            "reason" => Command::Field(ContactField::Reason, arg),
            "submit" => Command::Submit,
            _ => Command::Invalid(line),
        }
    }

    fn is_booking(&self) -> bool {
        matches!(
            self,
            Command::Date(_)
                | Command::PrevMonth
                | Command::NextMonth
                | Command::Slot(_)
                | Command::ClearSlot
                | Command::Continue
                | Command::Back
                | Command::Field(..)
                | Command::Submit
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "front_desk=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = WidgetConfig::from_env();
    tracing::info!(
        api_base = %config.api_base,
        timeout_secs = config.request_timeout.as_secs(),
        "Starting front desk"
    );

    let gateway: Gateway = Arc::new(LoggingGateway::new(HttpGateway::new(&config)?));
    let mut widget: App = Widget::new(config, gateway.clone(), gateway.clone(), gateway, today());
    widget.open();

    println!("{BOLD}{}{RESET}  {DIM}{}{RESET}\n", widget.config().title, widget.config().subtitle);
    let mut updates = widget.chat().subscribe();
    let mut printed = 0;
    print_new_turns(&updates.borrow_and_update(), &mut printed);
    for (i, reply) in widget.quick_replies().iter().enumerate() {
        println!("  {DIM}/quick {}{RESET}  {reply}", i + 1);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = Command::parse(line.trim());
        if matches!(command, Command::Quit) {
            break;
        }
        let booking_command = command.is_booking();
        run(&mut widget, command).await;

        if updates.has_changed().unwrap_or(false) {
            print_new_turns(&updates.borrow_and_update(), &mut printed);
        }
        if booking_command && widget.booking().is_open() {
            print_booking(widget.booking().draft(), &widget.config().timezone);
        }
    }

    tracing::info!("Front desk closed");
    Ok(())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn run(widget: &mut App, command: Command<'_>) {
    if command.is_booking() && !widget.booking().is_open() {
        println!("Open the booking calendar with /book first.");
        return;
    }

    match command {
        Command::Say(text) => widget.send(text).await,
        Command::Quick(index) => widget.send_quick_reply(index).await,
        Command::Rate(value) => {
            let target = widget.chat().transcript().feedback_target().map(|t| t.id);
            let rated = target.is_some_and(|id| widget.chat_mut().rating_sink().rate(id, value));
            if rated {
                println!("{DIM}{}{RESET}", rating_acknowledgment(value));
            } else {
                println!("{DIM}Nothing to rate.{RESET}");
            }
        }
        Command::Restart => widget.restart(),
        Command::Help => println!("{HELP}"),
        Command::Book => {
            widget.open_booking(today());
            print_booking(widget.booking().draft(), &widget.config().timezone);
        }
        Command::Close => widget.close_booking(),
        Command::Date(date) => widget.booking_mut().select_date(date, today()).await,
        Command::PrevMonth => widget.booking_mut().previous_month(),
        Command::NextMonth => widget.booking_mut().next_month(),
        Command::Slot(index) => {
            let slot = widget.booking().draft().available_slots.get(index).cloned();
            match slot {
                Some(slot) => widget.booking_mut().choose_slot(slot),
                None => println!("No time #{}.", index + 1),
            }
        }
        Command::ClearSlot => widget.booking_mut().clear_slot(),
        Command::Continue => widget.booking_mut().continue_to_details(),
        Command::Back => widget.booking_mut().back(),
        Command::Field(field, value) => widget.booking_mut().set_contact_field(field, value),
        Command::Submit => {
            widget.submit_booking().await;
        }
        Command::Invalid(line) => println!("Unrecognised command {line:?}. Try /help."),
        Command::Quit => {}
    }
}

fn print_new_turns(transcript: &Transcript, printed: &mut usize) {
    if transcript.len() < *printed {
        println!("{DIM}--- new conversation ---{RESET}");
        *printed = 0;
    }
    for turn in transcript.turns().iter().skip(*printed) {
        print_turn(turn);
    }
    *printed = transcript.len();
}

fn print_turn(turn: &Turn) {
    let speaker = match turn.role {
        Role::User => "you",
        Role::Assistant => "front desk",
    };
    let mut body = String::new();
    for (i, paragraph) in markup::parse(&turn.text).iter().enumerate() {
        if i > 0 {
            body.push_str("\n\n");
        }
        for span in paragraph {
            if span.bold {
                let _ = write!(body, "{BOLD}{}{RESET}", span.text);
            } else {
                body.push_str(&span.text);
            }
        }
    }
    println!("{DIM}{speaker}>{RESET} {body}\n");
}

fn print_booking(draft: &BookingDraft, timezone: &str) {
    match draft.stage {
        Stage::Select => print_select(draft, timezone),
        Stage::Details => print_details(draft),
    }
    if let Some(error) = &draft.error {
        println!("{BOLD}! {error}{RESET}");
    }
    println!();
}

fn print_select(draft: &BookingDraft, timezone: &str) {
    println!("{BOLD}{}{RESET}", draft.view.title());
    println!("  Su  Mo  Tu  We  Th  Fr  Sa");
    for week in draft.view.cells(today(), draft.selected_date).chunks(7) {
        let mut row = String::new();
        for cell in week {
            let _ = match cell {
                None => write!(row, "    "),
                Some(cell) if cell.selected => write!(row, " [{:>2}]", cell.date.day()),
                Some(cell) if cell.past => write!(row, "  {DIM}{:>2}{RESET}", cell.date.day()),
                Some(cell) => write!(row, "  {:>2}", cell.date.day()),
            };
        }
        println!("{row}");
    }

    let Some(date) = draft.selected_date else {
        println!("Pick a day with /date YYYY-MM-DD.");
        return;
    };
    println!("\n{}", date.format("%A, %B %-d"));
    if draft.loading {
        println!("Loading times…");
    } else if draft.available_slots.is_empty() {
        println!("No times available on this day.");
    } else {
        for (i, slot) in draft.available_slots.iter().enumerate() {
            let marker = if draft.chosen_slot.as_ref() == Some(slot) { "*" } else { " " };
            println!(" {marker}{:>2}. {}", i + 1, slot.label);
        }
        println!("{DIM}Times shown in {timezone}{RESET}");
    }
    if draft.can_continue() {
        println!("/continue when ready.");
    }
}

fn print_details(draft: &BookingDraft) {
    if let Some(slot) = &draft.chosen_slot {
        println!("{BOLD}{} at {}{RESET}", slot.start.format("%A, %B %-d"), slot.label);
    }
    let contact = &draft.contact;
    println!("  name:   {}", contact.name);
    println!("  email:  {}", contact.email);
    println!("  phone:  {}", contact.phone);
    println!("  reason: {}", contact.reason);
    if draft.submitting() {
        println!("Booking…");
    } else {
        println!("/submit to book, /back to change the time.");
    }
}
