use crate::view::{CalendarCell, CalendarPage, DayView};
use std::fmt::Write;

pub fn render_index(page: &CalendarPage) -> String {
    let day = &page.day;
    let summary = &day.summary;
    INDEX_HTML
        .replace("{{MONTH_LABEL}}", &page.month.label)
        .replace("{{PREV_HREF}}", &page_href(&page.month.prev_month.to_string(), &day.date.to_string()))
        .replace("{{NEXT_HREF}}", &page_href(&page.month.next_month.to_string(), &day.date.to_string()))
        .replace("{{CALENDAR}}", &render_calendar(page))
        .replace("{{SELECTED}}", &day.date.to_string())
        .replace("{{DAY_PERCENT}}", &summary.rounded_percent.to_string())
        .replace("{{DAY_DEG}}", &degrees(summary.rounded_percent))
        .replace("{{FRACTION}}", &format!("{}/{}", summary.completed, summary.total))
        .replace("{{MONTH_PERCENT}}", &page.progress.month_percent.to_string())
        .replace("{{MONTH_DEG}}", &degrees(page.progress.month_percent))
        .replace("{{YEAR_PERCENT}}", &page.progress.year_percent.to_string())
        .replace("{{HABITS}}", &render_habits(day))
        .replace("{{TASKS}}", &render_tasks(day))
        .replace("{{HABIT_FORM}}", &render_habit_form(day))
        .replace("{{TASK_FORM}}", &render_task_form(day))
        .replace("{{BANNER}}", &render_banner(day))
}

fn render_calendar(page: &CalendarPage) -> String {
    let month = page.month.month.to_string();
    let mut html = String::new();
    for cell in &page.month.cells {
        match cell {
            CalendarCell::Empty => html.push_str(r#"<div class="day empty"></div>"#),
            CalendarCell::Day(cell) => {
                let mut classes = String::from("day");
                if let Some(band) = cell.band {
                    classes.push(' ');
                    classes.push_str(band.css_class());
                }
                if cell.selected {
                    classes.push_str(" selected");
                }
                if cell.today {
                    classes.push_str(" today");
                }
                let _ = write!(
                    html,
                    r#"<a class="{classes}" href="{href}" title="{done}/{total}">{day}</a>"#,
                    href = page_href(&month, &cell.date.to_string()),
                    done = cell.completed,
                    total = cell.total,
                    day = cell.day,
                );
            }
        }
    }
    html
}

fn render_habits(day: &DayView) -> String {
    if day.habits.is_empty() {
        return r#"<li class="empty-list">No habits yet.</li>"#.to_string();
    }
    let date = day.date.to_string();
    let disabled = if day.editable { "" } else { " disabled" };
    let mut html = String::new();
    for habit in &day.habits {
        let class = if habit.completed { "item completed" } else { "item" };
        let checked = if habit.completed { " checked" } else { "" };
        let streak = if habit.streak > 0 {
            format!(r#"<span class="streak">{} day streak</span>"#, habit.streak)
        } else {
            String::new()
        };
        let _ = write!(
            html,
            r#"<li class="{class}">
  <form method="post" action="/days/{date}/habits/{index}/toggle" class="toggle">
    <input type="checkbox" onchange="this.form.submit()"{checked}{disabled} />
    <span class="text">{text}</span>{streak}
  </form>
  <form method="post" action="/habits/{index}/delete" onsubmit="return confirm('Remove habit?')">
    <input type="hidden" name="date" value="{date}" />
    <button class="delete" type="submit"{disabled}>&times;</button>
  </form>
</li>"#,
            index = habit.index,
            text = escape_html(&habit.text),
        );
    }
    html
}

fn render_tasks(day: &DayView) -> String {
    if day.tasks.is_empty() {
        return r#"<li class="empty-list">No tasks for this day.</li>"#.to_string();
    }
    let date = day.date.to_string();
    let disabled = if day.editable { "" } else { " disabled" };
    let mut html = String::new();
    for task in &day.tasks {
        let class = if task.completed { "item completed" } else { "item" };
        let checked = if task.completed { " checked" } else { "" };
        let _ = write!(
            html,
            r#"<li class="{class}">
  <form method="post" action="/days/{date}/tasks/{index}/toggle" class="toggle">
    <input type="checkbox" onchange="this.form.submit()"{checked}{disabled} />
    <span class="text">{text}</span>
  </form>
  <form method="post" action="/days/{date}/tasks/{index}/delete" onsubmit="return confirm('Remove task?')">
    <button class="delete" type="submit"{disabled}>&times;</button>
  </form>
</li>"#,
            index = task.index,
            text = escape_html(&task.text),
        );
    }
    html
}

fn render_habit_form(day: &DayView) -> String {
    if !day.editable {
        return String::new();
    }
    format!(
        r#"<form class="add" method="post" action="/habits">
  <input type="hidden" name="date" value="{date}" />
  <input type="text" name="text" placeholder="New habit" autocomplete="off" />
  <button type="submit">Add</button>
</form>"#,
        date = day.date,
    )
}

fn render_task_form(day: &DayView) -> String {
    if !day.editable {
        return r#"<p class="hint">Past days are read-only.</p>"#.to_string();
    }
    format!(
        r#"<form class="add" method="post" action="/days/{date}/tasks">
  <input type="text" name="text" placeholder="Task for this day" autocomplete="off" />
  <button type="submit">Add</button>
</form>"#,
        date = day.date,
    )
}

fn render_banner(day: &DayView) -> String {
    match &day.storage_error {
        Some(message) => format!(r#"<div class="banner">{}</div>"#, escape_html(message)),
        None => String::new(),
    }
}

fn page_href(month: &str, date: &str) -> String {
    format!("/?month={month}&amp;date={date}")
}

fn degrees(percent: u32) -> String {
    format!("{}deg", f64::from(percent) * 3.6)
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Calendar</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #10151c;
      --bg-2: #1b2633;
      --ink: #e9eef3;
      --muted: #8a97a6;
      --card: rgba(27, 38, 51, 0.86);
      --green: #2ee59d;
      --red: #ff4d5e;
      --accent: #4aa8ff;
      --shadow: 0 24px 60px rgba(0, 0, 0, 0.35);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #151d27 60%, #0c1116 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(980px, 100%);
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 24px;
      animation: rise 600ms ease;
    }

    .card {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 18px;
      align-content: start;
    }

    .calendar-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .calendar-header h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-size: 1.4rem;
      letter-spacing: 0.08em;
      margin: 0;
    }

    .nav {
      color: var(--ink);
      text-decoration: none;
      font-size: 1.4rem;
      padding: 4px 12px;
      border-radius: 999px;
      background: rgba(255, 255, 255, 0.06);
    }

    .weekdays,
    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 8px;
      text-align: center;
    }

    .weekdays span {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .day {
      aspect-ratio: 1;
      display: grid;
      place-items: center;
      border-radius: 12px;
      border: 2px solid transparent;
      color: var(--ink);
      text-decoration: none;
      background: rgba(255, 255, 255, 0.04);
    }

    .day.empty {
      background: transparent;
    }

    .day.today {
      font-weight: 600;
      text-decoration: underline;
    }

    .day.selected {
      outline: 2px solid var(--accent);
    }

    .day.perfect {
      background: var(--green);
      color: #0c1116;
      box-shadow: 0 0 14px rgba(46, 229, 157, 0.6);
    }

    .day.success {
      border-color: var(--green);
    }

    .day.fail {
      border-color: var(--red);
    }

    .day.fail.neon {
      background: var(--red);
      box-shadow: 0 0 14px rgba(255, 77, 94, 0.6);
    }

    .progress {
      display: flex;
      gap: 24px;
      align-items: center;
      justify-content: space-around;
    }

    .circle {
      width: 110px;
      height: 110px;
      border-radius: 50%;
      display: grid;
      place-items: center;
      background: conic-gradient(var(--green) var(--deg), rgba(255, 255, 255, 0.08) 0deg);
      animation: fill 900ms ease 300ms both;
    }

    .circle.month {
      background: conic-gradient(var(--accent) var(--deg), rgba(255, 255, 255, 0.08) 0deg);
    }

    .circle .inner {
      width: 84px;
      height: 84px;
      border-radius: 50%;
      background: var(--bg-2);
      display: grid;
      place-items: center;
      text-align: center;
    }

    .circle strong {
      font-size: 1.3rem;
    }

    .circle small,
    .label {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .year-bar {
      height: 10px;
      border-radius: 999px;
      background: rgba(255, 255, 255, 0.08);
      overflow: hidden;
    }

    .year-bar span {
      display: block;
      height: 100%;
      background: linear-gradient(90deg, var(--accent), var(--green));
    }

    h2 {
      margin: 0;
      font-size: 1.1rem;
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .item {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 10px;
      padding: 10px 14px;
      border-radius: 14px;
      background: rgba(255, 255, 255, 0.05);
    }

    .item form.toggle {
      display: flex;
      align-items: center;
      gap: 10px;
      flex: 1;
    }

    .item.completed .text {
      text-decoration: line-through;
      color: var(--muted);
    }

    .streak {
      margin-left: auto;
      font-size: 0.8rem;
      color: var(--green);
    }

    .empty-list,
    .hint {
      color: var(--muted);
      font-size: 0.9rem;
      margin: 0;
    }

    form.add {
      display: flex;
      gap: 10px;
    }

    form.add input[type="text"] {
      flex: 1;
      border-radius: 999px;
      border: 1px solid rgba(255, 255, 255, 0.12);
      background: transparent;
      color: var(--ink);
      padding: 10px 16px;
      font: inherit;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.delete {
      background: transparent;
      color: var(--red);
      padding: 4px 10px;
      font-size: 1.2rem;
    }

    button:disabled {
      opacity: 0.4;
      cursor: not-allowed;
    }

    .banner {
      grid-column: 1 / -1;
      padding: 12px 18px;
      border-radius: 14px;
      background: rgba(255, 77, 94, 0.18);
      color: #ffb3bb;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @keyframes fill {
      from {
        --deg: 0deg;
      }
    }

    @property --deg {
      syntax: '<angle>';
      inherits: false;
      initial-value: 0deg;
    }
  </style>
</head>
<body>
  <main class="app">
    {{BANNER}}
    <section class="card">
      <div class="calendar-header">
        <a class="nav" href="{{PREV_HREF}}" aria-label="Previous month">&lsaquo;</a>
        <h1>{{MONTH_LABEL}}</h1>
        <a class="nav" href="{{NEXT_HREF}}" aria-label="Next month">&rsaquo;</a>
      </div>
      <div class="weekdays">
        <span>Sun</span><span>Mon</span><span>Tue</span><span>Wed</span><span>Thu</span><span>Fri</span><span>Sat</span>
      </div>
      <div class="grid">{{CALENDAR}}</div>
      <div class="progress">
        <div class="circle" style="--deg: {{DAY_DEG}}">
          <div class="inner"><div><strong>{{DAY_PERCENT}}%</strong><br /><small>{{FRACTION}}</small></div></div>
        </div>
        <div class="circle month" style="--deg: {{MONTH_DEG}}">
          <div class="inner"><div><strong>{{MONTH_PERCENT}}%</strong><br /><small>Month</small></div></div>
        </div>
      </div>
      <div>
        <span class="label">Year {{YEAR_PERCENT}}%</span>
        <div class="year-bar"><span style="width: {{YEAR_PERCENT}}%"></span></div>
      </div>
    </section>
    <section class="card">
      <h2>Habits &middot; {{SELECTED}}</h2>
      <ul>{{HABITS}}</ul>
      {{HABIT_FORM}}
      <h2>Tasks</h2>
      <ul>{{TASKS}}</ul>
      {{TASK_FORM}}
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateKey, Habit, HabitRecords};
    use crate::store::HabitStore;
    use crate::view::build_page;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn store() -> HabitStore {
        let mut records = HabitRecords {
            habits: vec![
                Habit { text: "read <b>".into() },
                Habit { text: "walk".into() },
            ],
            ..HabitRecords::default()
        };
        records
            .completions
            .insert(DateKey::new(today()), BTreeSet::from([0]));
        HabitStore::new(records)
    }

    #[test]
    fn renders_today_with_editable_controls() {
        let page = build_page(&store(), DateKey::new(today()), today(), today(), None);
        let html = render_index(&page);
        assert!(html.contains("OCTOBER 2026"));
        assert!(html.contains("read &lt;b&gt;"));
        assert!(!html.contains("read <b>"));
        assert!(html.contains("<strong>50%</strong>"));
        assert!(html.contains("1/2"));
        assert!(html.contains(r#"action="/habits""#));
        assert!(html.contains(r#"class="day fail selected today""#));
        assert!(html.contains("Remove habit?"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn past_days_hide_add_forms() {
        let yesterday = DateKey::new(today().pred_opt().unwrap());
        let page = build_page(&store(), yesterday, today(), today(), Some("disk full"));
        let html = render_index(&page);
        assert!(!html.contains(r#"action="/habits""#));
        assert!(html.contains("Past days are read-only."));
        assert!(html.contains(r#"<div class="banner">disk full</div>"#));
        assert!(html.contains("fail neon selected"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
