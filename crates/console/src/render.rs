//! Plain-text views of the page.

use std::fmt::Write;

use helpdesk_core::ticket::BreakdownRow;
use helpdesk_core::{
    truncate, AppShell, FilterState, FormNotice, StatsPanel, Tab, Ticket, TicketBoard, TicketForm,
    TicketStats,
};

/// Characters of description shown per list entry.
const EXCERPT_CHARS: usize = 120;

/// Width of a 100% dashboard bar.
const BAR_WIDTH: usize = 30;

/// Wrap `text` in a 24-bit ANSI foreground color given as `#rrggbb`.
///
/// Returns `text` unchanged when `colored` is off or `hex` is malformed.
pub fn paint(text: &str, hex: &str, colored: bool) -> String {
    let rgb = hex
        .strip_prefix('#')
        .filter(|h| h.len() == 6)
        .and_then(|h| {
            let channel = |i: usize| u8::from_str_radix(h.get(i..i + 2)?, 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        });
    match rgb {
        Some((r, g, b)) if colored => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        _ => text.to_string(),
    }
}

/// Render the tab strip and the active tab.
pub fn render(shell: &AppShell, colored: bool) -> String {
    let mut out = String::new();
    let tabs: Vec<String> = Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == shell.active_tab() {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join(" | "));
    let _ = writeln!(out, "{}", "-".repeat(60));

    let body = match shell.active_tab() {
        Tab::Submit => render_form(shell.form()),
        Tab::List => render_board(shell.board(), colored),
        Tab::Dashboard => render_stats(shell.stats()),
    };
    out.push_str(&body);
    out
}

pub fn render_form(form: &TicketForm) -> String {
    let draft = form.draft();
    let mut out = String::new();

    let _ = writeln!(out, "Title:       {}", draft.title);
    let _ = writeln!(out, "Description: {}", draft.description);

    let suggested = if form.is_classified() {
        "  (suggested)"
    } else {
        ""
    };
    let _ = writeln!(out, "Category:    {}{}", draft.category.label(), suggested);
    let _ = writeln!(out, "Priority:    {}{}", draft.priority.label(), suggested);

    if form.is_classifying() {
        let _ = writeln!(out, "Classifying...");
    }
    if form.is_submitting() {
        let _ = writeln!(out, "Submitting...");
    }
    match form.notice() {
        Some(FormNotice::Success(message)) => {
            let _ = writeln!(out, "OK: {message}");
        }
        Some(FormNotice::Error(message)) => {
            let _ = writeln!(out, "Error: {message}");
        }
        None => {}
    }
    out
}

fn describe_filters(filters: &FilterState, search_input: &str) -> String {
    let show = |value: Option<&str>| value.unwrap_or("all").to_string();
    format!(
        "category={} priority={} status={} search={:?}",
        show(filters.category.as_ref().map(|c| c.as_str())),
        show(filters.priority.as_ref().map(|p| p.as_str())),
        show(filters.status.as_ref().map(|s| s.as_str())),
        search_input,
    )
}

pub fn render_board(board: &TicketBoard, colored: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Filters: {}",
        describe_filters(board.filters(), board.search_input())
    );

    if board.is_loading() {
        let _ = writeln!(out, "Loading...");
    }
    out.push_str(&render_tickets(board.tickets().as_slice(), colored));
    out
}

pub fn render_tickets(tickets: &[Ticket], colored: bool) -> String {
    if tickets.is_empty() {
        return "No tickets found.\n".to_string();
    }
    tickets
        .iter()
        .map(|ticket| render_ticket(ticket, colored))
        .collect()
}

pub fn render_ticket(ticket: &Ticket, colored: bool) -> String {
    let priority = format!("[{}]", ticket.priority.label());
    let status = format!("[{}]", ticket.status.label());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{} {} {} {} {}",
        ticket.id,
        paint(&priority, ticket.priority.color(), colored),
        paint(&status, ticket.status.color(), colored),
        ticket.category.icon(),
        ticket.title,
    );
    let _ = writeln!(out, "    {}", truncate(&ticket.description, EXCERPT_CHARS));

    let created = ticket.created_at.format("%Y-%m-%d %H:%M");
    match ticket.status.advance_label() {
        Some(action) => {
            let _ = writeln!(out, "    {created}  > {action} (advance {})", ticket.id);
        }
        None => {
            let _ = writeln!(out, "    {created}");
        }
    }
    out
}

pub fn render_stats(panel: &StatsPanel) -> String {
    let mut out = String::new();
    if panel.is_loading() {
        let _ = writeln!(out, "Loading...");
    }
    match panel.stats() {
        Some(stats) => out.push_str(&render_stats_snapshot(stats)),
        None if !panel.is_loading() => {
            let _ = writeln!(out, "No statistics available.");
        }
        None => {}
    }
    out
}

pub fn render_stats_snapshot(stats: &TicketStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total tickets:   {}", stats.total_tickets);
    let _ = writeln!(out, "Open tickets:    {}", stats.open_tickets);
    let _ = writeln!(out, "Avg per day:     {:.1}", stats.avg_tickets_per_day);

    let _ = writeln!(out, "\nBy priority:");
    for row in stats.priority_rows() {
        out.push_str(&render_bar(&row));
    }
    let _ = writeln!(out, "\nBy category:");
    for row in stats.category_rows() {
        out.push_str(&render_bar(&row));
    }
    out
}

fn render_bar(row: &BreakdownRow) -> String {
    let filled = (row.share_percent / 100.0 * BAR_WIDTH as f64).round() as usize;
    format!(
        "  {:<10} {:<width$} {}\n",
        row.label,
        "#".repeat(filled.min(BAR_WIDTH)),
        row.count,
        width = BAR_WIDTH,
    )
}
