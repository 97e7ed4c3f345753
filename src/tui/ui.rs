use chrono::{NaiveDate, TimeZone};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{App, FormField, LoginField, Notice, Screen, TaskForm};
use crate::application::dashboard::View;
use crate::domain::calendar::{CalendarCell, CalendarGrid, WEEKDAY_LABELS};
use crate::domain::date_parts::DateField;
use crate::domain::tag::{Tag, color_rgb};
use crate::domain::task::Task;

const DUE_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn draw<Tz: TimeZone>(f: &mut Frame<'_>, app: &App, today: NaiveDate, tz: &Tz)
where
    Tz::Offset: std::fmt::Display,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    draw_header(f, app, chunks[0]);
    match app.screen {
        Screen::Login => draw_login(f, app, chunks[1]),
        Screen::Dashboard => {
            match app.dashboard.view() {
                View::Board => draw_board(f, app, chunks[1], tz),
                View::Calendar => draw_calendar(f, app, chunks[1], today, tz),
            }
            if let Some(form) = &app.form { draw_form(f, form, app.dashboard.tags(), tz); }
        }
    }
    draw_footer(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let text = match &app.user {
        Some(user) => {
            let stats = app.dashboard.board().stats();
            format!("{} <{}>  |  {} tasks: {} to do, {} in progress, {} done", user.name, user.email, stats.total(), stats.todo, stats.in_progress, stats.done)
        }
        None => "Not signed in".to_string(),
    };
    f.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("taskboard")), area);
}

fn draw_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = match &app.notice {
        Some(Notice::Error(msg)) => (msg.clone(), Style::default().fg(Color::Red)),
        Some(Notice::Info(msg)) => (msg.clone(), Style::default().fg(Color::Green)),
        None => (help(app).to_string(), Style::default()),
    };
    f.render_widget(Paragraph::new(text).style(style).block(Block::default().borders(Borders::ALL).title("info")), area);
}

fn help(app: &App) -> &'static str {
    match (app.screen, app.form.is_some(), app.dashboard.view()) {
        (Screen::Login, ..) => "Tab: next field  F2: sign in / register  Enter: submit  Esc: quit",
        (_, true, _) => "Tab: next field  Space: toggle tag  Left/Right: pick tag or color  Enter: save  Esc: cancel",
        (_, false, View::Board) => "Arrows: select  s: next status  d: delete  n: new  v: calendar  r: reload  l: logout  q: quit",
        (_, false, View::Calendar) => "Left/Right: month  t: today  n: new  v: board  r: reload  l: logout  q: quit",
    }
}

fn draw_login(f: &mut Frame<'_>, app: &App, area: Rect) {
    let form = &app.login;
    let mut lines = Vec::new();
    for field in form.fields() {
        let (label, value) = match field {
            LoginField::Name => ("Name", form.name.clone()),
            LoginField::Email => ("Email", form.email.clone()),
            LoginField::Password => ("Password", "*".repeat(form.password.chars().count())),
        };
        let focused = *field == form.field;
        lines.push(field_line(label, &value, focused));
    }
    let title = if form.register { "Create account" } else { "Sign in" };
    let popup = centered(area, 50, (lines.len() + 2) as u16);
    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)), popup);
}

fn draw_board<Tz: TimeZone>(f: &mut Frame<'_>, app: &App, area: Rect, tz: &Tz)
where
    Tz::Offset: std::fmt::Display,
{
    let columns = app.columns();
    let constraints: Vec<Constraint> = columns.iter().map(|_| Constraint::Ratio(1, columns.len() as u32)).collect();
    let areas = Layout::default().direction(Direction::Horizontal).constraints(constraints).split(area);

    for (idx, (status, tasks)) in columns.iter().enumerate() {
        let items: Vec<ListItem> = tasks.iter().map(|t| task_item(t, tz)).collect();
        let mut state = ListState::default();
        let active = idx == app.column;
        if active && !tasks.is_empty() { state.select(Some(app.row)); }
        let border = if active { Style::default().fg(Color::Cyan) } else { Style::default() };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).border_style(border).title(format!("{} ({})", status.label(), tasks.len())))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
        f.render_stateful_widget(list, areas[idx], &mut state);
    }
}

fn task_item<'a, Tz: TimeZone>(task: &'a Task, tz: &Tz) -> ListItem<'a>
where
    Tz::Offset: std::fmt::Display,
{
    let mut lines = vec![Line::from(Span::styled(task.title.as_str(), Style::default().add_modifier(Modifier::BOLD)))];
    if let Some(desc) = task.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(Line::from(Span::styled(format!("  {desc}"), Style::default().fg(Color::Gray))));
    }
    if let Some(due) = task.due_date {
        lines.push(Line::from(format!("  due {}", due.with_timezone(tz).format(DUE_FORMAT))));
    }
    if !task.tags.is_empty() {
        lines.push(Line::from(task.tags.iter().flat_map(|t| [tag_span(t), Span::raw(" ")]).collect::<Vec<_>>()));
    }
    ListItem::new(lines)
}

fn tag_span(tag: &Tag) -> Span<'static> {
    Span::styled(format!("#{}", tag.name), color_style(tag.rgb()))
}

fn color_style(rgb: Option<(u8, u8, u8)>) -> Style {
    match rgb {
        Some((r, g, b)) => Style::default().fg(Color::Rgb(r, g, b)),
        None => Style::default(),
    }
}

fn draw_calendar<Tz: TimeZone>(f: &mut Frame<'_>, app: &App, area: Rect, today: NaiveDate, tz: &Tz)
where
    Tz::Offset: std::fmt::Display,
{
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let grid = app.dashboard.calendar(today, tz);
    let title = app.dashboard.cursor().title();
    f.render_widget(Paragraph::new(month_lines(&grid)).block(Block::default().borders(Borders::ALL).title(title)), halves[0]);

    let upcoming: Vec<ListItem> = app.dashboard.upcoming().into_iter().map(|t| task_item(t, tz)).collect();
    f.render_widget(List::new(upcoming).block(Block::default().borders(Borders::ALL).title("Upcoming")), halves[1]);
}

/// One header row of weekday labels, then two lines per week: the day
/// numbers and a task-count marker beneath each.
fn month_lines(grid: &CalendarGrid) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(WEEKDAY_LABELS.iter().map(|l| format!("{l:^5}")).collect::<String>())];
    for week in grid.weeks() {
        let mut days = Vec::new();
        let mut counts = Vec::new();
        for cell in week {
            match cell {
                CalendarCell::Blank => {
                    days.push(Span::raw(" ".repeat(5)));
                    counts.push(Span::raw(" ".repeat(5)));
                }
                CalendarCell::Day(day) => {
                    let style = if day.is_today { Style::default().add_modifier(Modifier::REVERSED) } else { Style::default() };
                    days.push(Span::styled(format!("{:^5}", day.day()), style));
                    let marker = if day.task_count > 0 { format!("{:^5}", format!("*{}", day.task_count)) } else { " ".repeat(5) };
                    counts.push(Span::styled(marker, Style::default().fg(Color::Yellow)));
                }
            }
        }
        lines.push(Line::from(days));
        lines.push(Line::from(counts));
    }
    lines
}

fn draw_form<Tz: TimeZone>(f: &mut Frame<'_>, form: &TaskForm, tags: &[Tag], tz: &Tz)
where
    Tz::Offset: std::fmt::Display,
{
    let draft = &form.draft;
    let mut lines = vec![
        field_line("Title", &draft.title, form.field == FormField::Title),
        field_line("Description", &draft.description, form.field == FormField::Description),
    ];

    let mut date = vec![Span::raw("Due         ")];
    for (i, field) in DateField::ALL.into_iter().enumerate() {
        if i > 0 { date.push(Span::raw(match field { DateField::Month | DateField::Year => "/", DateField::Hour => "  ", _ => ":" })); }
        let style = if form.field == FormField::Date(field) { focus_style() } else { Style::default() };
        let value = draft.due.field(field);
        date.push(Span::styled(if value.is_empty() { "_".to_string() } else { value.to_string() }, style));
    }
    lines.push(Line::from(date));
    lines.push(Line::from(match draft.due.preview(tz) {
        Some(preview) => Span::styled(format!("            {preview}"), Style::default().fg(Color::Green)),
        None if !draft.due.is_valid() => Span::styled("            (not a valid date)", Style::default().fg(Color::Red)),
        None => Span::styled("            (not a valid time)", Style::default().fg(Color::Red)),
    }));

    let mut tag_spans = vec![Span::raw("Tags        ")];
    if tags.is_empty() { tag_spans.push(Span::raw("(none yet)")); }
    for (i, tag) in tags.iter().enumerate() {
        let mark = if draft.tag_ids.contains(&tag.id) { "[x]" } else { "[ ]" };
        let mut span = tag_span(tag);
        span.content = format!("{mark}{}", span.content).into();
        if form.field == FormField::Tags && i == form.tag_cursor { span.style = span.style.add_modifier(Modifier::REVERSED); }
        tag_spans.push(span);
        tag_spans.push(Span::raw(" "));
    }
    lines.push(Line::from(tag_spans));

    let color = form.new_tag_color();
    let mut new_tag = field_line("New tag", &form.new_tag_name, form.field == FormField::NewTag);
    new_tag.spans.push(Span::raw("  "));
    new_tag.spans.push(Span::styled(color, color_style(color_rgb(color))));
    lines.push(new_tag);

    let popup = centered(f.size(), 70, (lines.len() + 2) as u16);
    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(Block::default().borders(Borders::ALL).title("New task")), popup);
}

fn focus_style() -> Style { Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD) }

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused { focus_style() } else { Style::default() };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![Span::raw(format!("{label:<12}")), Span::styled(format!("{value}{cursor}"), style)])
}

fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
