use crate::analysis::alerts::Severity;
use crate::analysis::score::SpeedBand;
use crate::analysis::summary::GlobalSnapshot;
use crate::model::floor::TableStatus;
use crate::model::server::ServerId;
use crate::policy::ScoringPolicy;
use crate::state::history::ScoreHistory;
use crate::state::snapshot::{ServerView, Snapshot};
use crate::tui::app::App;
use crate::tui::style;
use chrono::NaiveTime;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Color::White;
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points, Rectangle};
use ratatui::widgets::{
    Block, Borders, Cell, Gauge, LineGauge, Padding, Paragraph, Row, Table, Wrap,
};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn draw_app(frame: &mut Frame, app: &App) {
    let snapshot = app.monitor.current_snapshot();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(17),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(build_header(app), chunks[0]);
    render_stats(frame, snapshot.global(), chunks[1]);
    render_cards(frame, app, chunks[2]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_floor_map(frame, snapshot, bottom[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(snapshot.servers().len() as u16 + 3),
        ])
        .split(bottom[1]);
    frame.render_widget(
        build_alerts_table(snapshot, app.monitor.previous_snapshot()),
        right[0],
    );
    frame.render_widget(build_history_table(snapshot, app.monitor.history()), right[1]);

    frame.render_widget(build_footer(app), chunks[4]);
}

fn server_color(snapshot: &Snapshot, id: &ServerId) -> Color {
    let idx = snapshot
        .servers()
        .iter()
        .position(|s| s.id() == id)
        .unwrap_or(0);
    style::server_color(idx)
}

fn hours_minutes(minutes: i64) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Text sparkline over a 0-100 series.
pub fn sparkline<'a>(points: impl IntoIterator<Item = &'a u8>) -> String {
    points
        .into_iter()
        .map(|p| SPARK[(*p.min(&100) as usize * (SPARK.len() - 1)) / 100])
        .collect()
}

fn build_header(app: &'_ App) -> Block<'_> {
    let snapshot = app.monitor.current_snapshot();
    let live = if app.running {
        Span::raw(" ● LIVE ").style(Style::default().bold().green())
    } else {
        Span::raw(" ‖ PAUSED ").style(Style::default().bold().yellow())
    };
    let mut spans = vec![
        Span::raw(" Floorwatch ").style(Style::default().bold().cyan()),
        Span::raw("|").style(style::dim()),
        live,
        Span::raw(" Feed: ").style(style::dim()),
        Span::raw(app.monitor.feed_name().to_string()).style(Style::default().bold()),
        Span::raw(" Refresh: ").style(style::dim()),
        Span::raw(format!("{}", snapshot.generation())).style(Style::default().bold()),
        Span::raw(" Time: ").style(style::dim()),
        Span::raw(snapshot.taken_at().format("%H:%M").to_string())
            .style(Style::default().bold().yellow()),
        Span::raw(" "),
    ];
    if !snapshot.rejected().is_empty() {
        let ids = snapshot
            .rejected()
            .iter()
            .map(|e| e.server().as_str())
            .collect::<Vec<&str>>()
            .join(", ");
        spans.push(Span::raw(format!("Rejected: {} ", ids)).style(Style::default().bold().red()));
    }
    Block::new()
        .title(Line::from(spans))
        .title_alignment(Alignment::Center)
}

fn stat_card<'a>(label: &'a str, value: String, sub: String, highlight: bool) -> Paragraph<'a> {
    let value_style = if highlight {
        Style::default().bold().yellow()
    } else {
        Style::default().bold()
    };
    Paragraph::new(vec![
        Line::from(Span::styled(value, value_style)),
        Line::from(Span::styled(sub, style::dim())),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(format!(" {} ", label), style::dim()))
            .padding(Padding::horizontal(1)),
    )
}

fn render_stats(frame: &mut Frame, global: &GlobalSnapshot, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let avg = global
        .avg_score()
        .map(|s| format!("avg score {:.0}", s))
        .unwrap_or_else(|| "no scores".to_string());
    let cards = [
        stat_card(
            "Active servers",
            global.active_server_count().to_string(),
            avg,
            true,
        ),
        stat_card(
            "Guests",
            global.total_clients().to_string(),
            "in the room".to_string(),
            false,
        ),
        stat_card(
            "Tables seated",
            format!("{}/{}", global.tables_occupied(), global.total_tables()),
            format!("{:.0}% occupancy", global.occupancy_percent()),
            false,
        ),
        stat_card(
            "Average wait",
            format!("{:.1} min", global.avg_wait_minutes()),
            "before first visit".to_string(),
            false,
        ),
        stat_card(
            "Service",
            global.service_start().format("%H:%M").to_string(),
            format!(
                "{} alerts, {} critical",
                global.total_alerts(),
                global.critical_alerts()
            ),
            global.critical_alerts() > 0,
        ),
    ];
    for (card, cell) in cards.into_iter().zip(cells.iter()) {
        frame.render_widget(card, *cell);
    }
}

fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let servers = app.sorted_servers();
    if servers.is_empty() {
        frame.render_widget(
            Paragraph::new("No servers reporting")
                .style(style::dim())
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    }

    let snapshot = app.monitor.current_snapshot();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, servers.len() as u32); servers.len()])
        .split(area);
    for (view, column) in servers.iter().zip(columns.iter()) {
        render_card(
            frame,
            view,
            server_color(snapshot, view.id()),
            snapshot.taken_at(),
            &app.monitor.policy().scoring,
            *column,
        );
    }
}

fn render_card(
    frame: &mut Frame,
    view: &ServerView,
    color: Color,
    now: NaiveTime,
    scoring: &ScoringPolicy,
    area: Rect,
) {
    let metrics = view.metrics();
    let score = view.score();
    let band = style::band(score.label());
    let speed_band = style::speed(SpeedBand::for_speed(metrics.speed, scoring));

    let border = if view.alerts().iter().any(|a| a.severity() == Severity::Critical) {
        Style::default().red()
    } else if !view.alerts().is_empty() {
        Style::default().yellow()
    } else {
        Style::default()
    };

    let camera = metrics.camera.as_deref().unwrap_or("no camera");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Line::from(vec![
            Span::from(format!(" {} ", metrics.name)).style(Style::default().bold().fg(color)),
            Span::from(format!("{} ", camera)).style(style::dim()),
        ]))
        .title(
            Line::from(
                Span::from(band.badge).style(Style::default().bold().fg(Color::Black).bg(band.color)),
            )
            .right_aligned(),
        )
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(band.color).bg(Color::Black))
            .percent(score.composite() as u16)
            .label(Span::styled(
                format!(
                    "Score {} {}",
                    score.composite(),
                    style::trend_arrow(view.trend())
                ),
                Style::default().bold().fg(White),
            )),
        rows[0],
    );

    let bars = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4])
        .split(rows[2]);
    let parts = [
        ("Speed", scoring.speed_weight, score.speed(), color),
        ("Reactivity", scoring.reactivity_weight, score.reactivity(), band.color),
        ("Coverage", scoring.coverage_weight, score.coverage(), Color::Green),
        ("Standing", scoring.standing_weight, score.standing(), Color::Blue),
    ];
    for ((label, weight, value, bar_color), bar) in parts.into_iter().zip(bars.iter()) {
        frame.render_widget(
            LineGauge::default()
                .filled_style(Style::default().fg(bar_color))
                .unfilled_style(style::dim())
                .ratio(value as f64 / 100.0)
                .label(format!("{:<10} ×{:>2}% {:>3}", label, weight, value)),
            *bar,
        );
    }

    let shift = metrics.on_shift_for(now).num_minutes();
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Speed ", style::dim()),
                Span::raw(format!("{:.1} px/f ", metrics.speed)),
                Span::styled(format!("{}  ", speed_band.label), Style::default().fg(speed_band.color)),
                Span::styled("Resp ", style::dim()),
                Span::raw(format!("{:.1} min", metrics.avg_response_minutes)),
            ]),
            Line::from(vec![
                Span::styled("Tables ", style::dim()),
                Span::raw(format!(
                    "{}/{} ({:.0}%)  ",
                    metrics.tables_visited,
                    metrics.total_tables,
                    metrics.coverage_percent()
                )),
                Span::styled("Standing ", style::dim()),
                Span::raw(format!("{:.0}%", metrics.standing_percent)),
            ]),
            Line::from(Span::styled(
                format!(
                    "Recog {:.0}% · {} · since {} ({})",
                    metrics.recognition_percent,
                    metrics.short_zone(),
                    metrics.arrival.format("%H:%M"),
                    hours_minutes(shift)
                ),
                style::dim(),
            )),
        ]),
        rows[3],
    );

    let alert_lines = view
        .alerts()
        .iter()
        .map(|a| {
            let sev = style::severity(a.severity());
            Line::from(vec![
                Span::styled(format!("{} ", sev.glyph), Style::default().fg(sev.color)),
                Span::styled(a.message().to_string(), Style::default().fg(sev.color)),
            ])
        })
        .collect::<Vec<Line>>();
    frame.render_widget(
        Paragraph::new(alert_lines).wrap(Wrap { trim: true }),
        rows[4],
    );
}

fn render_floor_map(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let legend = style::TABLES
        .iter()
        .flat_map(|t| {
            [
                Span::styled("■ ", Style::default().fg(t.color)),
                Span::styled(format!("{} ", t.label), style::dim()),
            ]
        })
        .collect::<Vec<Span>>();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Line::from(Span::from(" Floor ").style(Style::default().bold())))
                .title(Line::from(legend).right_aligned()),
        )
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(move |ctx| {
            // floor coordinates grow downwards, canvas ones upwards
            for table in snapshot.floor().tables() {
                let st = style::table(table.status());
                let y = 100.0 - table.y();
                ctx.draw(&Rectangle {
                    x: table.x() - 5.0,
                    y: y - 4.0,
                    width: 10.0,
                    height: 8.0,
                    color: st.color,
                });
                let label = match (table.status(), table.wait_minutes()) {
                    (TableStatus::Waiting, Some(wait)) => {
                        format!("{} {}m", table.id(), wait)
                    }
                    _ => table.id().to_string(),
                };
                ctx.print(
                    table.x() - 2.0,
                    y,
                    Span::styled(label, Style::default().fg(st.color)),
                );
            }
            ctx.layer();
            for (idx, view) in snapshot.servers().iter().enumerate() {
                let color = style::server_color(idx);
                let (x, y) = view.metrics().position;
                let y = 100.0 - y;
                ctx.draw(&Points {
                    coords: &[(x, y)],
                    color,
                });
                ctx.print(
                    x + 1.5,
                    y,
                    Span::styled(
                        view.metrics().name.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn build_alerts_table<'a>(snapshot: &'a Snapshot, previous: &Snapshot) -> Table<'a> {
    let raised = snapshot
        .raised_since(previous)
        .iter()
        .map(|a| a.id())
        .collect::<Vec<&str>>();
    let title = Line::from(vec![
        Span::from(" Active alerts ").style(Style::default().bold()),
        Span::from(format!("{} ", snapshot.alerts().len())).style(Style::default().bold().red()),
        Span::from(format!("({} new) ", raised.len())).style(style::dim()),
    ]);

    Table::new(
        snapshot.alerts().iter().map(move |alert| {
            let sev = style::severity(alert.severity());
            let tag = if raised.contains(&alert.id()) {
                format!("{}*", sev.tag)
            } else {
                sev.tag.to_string()
            };
            let name = snapshot
                .server(alert.server())
                .map(|v| v.metrics().name.clone())
                .unwrap_or_else(|| alert.server().to_string());
            Row::new(vec![
                Cell::from(tag).style(Style::default().bold().fg(sev.color)),
                Cell::from(name)
                    .style(Style::default().fg(server_color(snapshot, alert.server()))),
                Cell::from(alert.kind().slug()).style(style::dim()),
                Cell::from(alert.message().to_string()),
                Cell::from(alert.timestamp().format("%H:%M").to_string()).style(style::dim()),
                Cell::from(alert.evidence().unwrap_or("-").to_string()).style(style::dim()),
            ])
        }),
        [
            Constraint::Length(5),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(13),
        ],
    )
    .header(
        Row::new([
            Cell::from("Sev"),
            Cell::from("Server"),
            Cell::from("Kind"),
            Cell::from("Message"),
            Cell::from("Time"),
            Cell::from("Evidence"),
        ])
        .style(Style::default().bg(Color::DarkGray).fg(White)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1)),
    )
}

/// Column width for a sparkline of `capacity` points.
fn sparkline_width(capacity: usize) -> u16 {
    u16::try_from(capacity).unwrap_or(u16::MAX)
}

fn build_history_table<'a>(snapshot: &'a Snapshot, history: &'a ScoreHistory) -> Table<'a> {
    let span = snapshot
        .servers()
        .iter()
        .flat_map(|v| v.metrics().slots.iter().map(|s| s.slot))
        .fold(None, |range: Option<(NaiveTime, NaiveTime)>, t| match range {
            Some((first, last)) => Some((first.min(t), last.max(t))),
            None => Some((t, t)),
        })
        .map(|(first, last)| {
            format!("{}-{} ", first.format("%H:%M"), last.format("%H:%M"))
        })
        .unwrap_or_default();
    let slot_count = snapshot
        .servers()
        .iter()
        .map(|v| v.metrics().slots.len())
        .max()
        .unwrap_or(0);

    Table::new(
        snapshot.servers().iter().enumerate().map(|(idx, view)| {
            let color = style::server_color(idx);
            let series = history
                .series(view.id())
                .map(|points| sparkline(points))
                .unwrap_or_default();
            let activity = sparkline(view.metrics().slots.iter().map(|s| &s.activity));
            Row::new(vec![
                Cell::from(view.metrics().name.clone()).style(Style::default().fg(color)),
                Cell::from(series).style(Style::default().fg(color)),
                Cell::from(format!("{:>3}", view.score().composite()))
                    .style(Style::default().fg(style::band(view.score().label()).color)),
                Cell::from(activity).style(Style::default().fg(color)),
                Cell::from(format!("{:>3}", view.metrics().tables_visited)),
            ])
        }),
        [
            Constraint::Length(10),
            Constraint::Length(sparkline_width(history.capacity())),
            Constraint::Length(5),
            Constraint::Length(sparkline_width(slot_count.max(8))),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new([
            Cell::from("Server"),
            Cell::from("Score history"),
            Cell::from("Now"),
            Cell::from("Activity /15m"),
            Cell::from("Tables"),
        ])
        .style(Style::default().bg(Color::DarkGray).fg(White)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![
                Span::from(" Service history ").style(Style::default().bold()),
                Span::from(span).style(style::dim()),
            ]))
            .padding(Padding::horizontal(1)),
    )
}

fn build_footer(app: &'_ App) -> Paragraph<'_> {
    Paragraph::new(Line::from(vec![
        Span::styled(" q ", Style::default().bold()),
        Span::styled("quit  ", style::dim()),
        Span::styled("space ", Style::default().bold()),
        Span::styled("refresh  ", style::dim()),
        Span::styled("p ", Style::default().bold()),
        Span::styled(if app.running { "pause  " } else { "resume  " }, style::dim()),
        Span::styled("s ", Style::default().bold()),
        Span::styled(format!("sort ({})  ", app.sort_mode.as_str()), style::dim()),
        Span::styled(
            format!("every {}s", app.refresh_every().as_secs_f64()),
            style::dim(),
        ),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_maps_range_onto_blocks() {
        assert_eq!("▁▄█", sparkline(&[0u8, 50, 100]));
        assert_eq!("", sparkline(&[] as &[u8]));
    }

    #[test]
    fn test_sparkline_width_saturates() {
        assert_eq!(16, sparkline_width(16));
        assert_eq!(u16::MAX, sparkline_width(65_535));
        assert_eq!(u16::MAX, sparkline_width(70_000));
    }

    #[test]
    fn test_hours_minutes() {
        assert_eq!("1h 42m", hours_minutes(102));
        assert_eq!("0h 05m", hours_minutes(5));
    }
}
