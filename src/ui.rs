use blast_zones::catalog::Rgba;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use crate::app::{App, SIDE_PANEL_WIDTH};
use crate::braille::{BrailleCanvas, BLANK};
use crate::map::RingLayers;

fn ring_color(color: Rgba) -> Color {
    Color::Rgb(color.r(), color.g(), color.b())
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map + side panel
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(rows[0]);

    render_map(frame, app, columns[0]);
    render_side_panel(frame, app, columns[1]);
    render_status_bar(frame, app, rows[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ({} kt) ", app.profile().name, app.profile().yield_kt),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app.rings.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        app.detonation,
        app.observer,
    );

    let cursor_pos = app.mouse_pixel_pos().and_then(|(px, py)| {
        let cx = (px / 2) as u16;
        let cy = (py / 4) as u16;
        (cx < inner.width && cy < inner.height).then_some((cx, cy))
    });

    frame.render_widget(MapWidget { layers, cursor_pos }, inner);
}

/// Braille ring layers with marker labels overlaid
struct MapWidget {
    layers: RingLayers,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget {
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (col, row, ch) in canvas.lit_cells() {
            if col >= area.width as usize || row >= area.height as usize || ch == BLANK {
                continue;
            }
            let (x, y) = (area.x + col as u16, area.y + row as u16);
            buf[(x, y)].set_char(ch).set_fg(color);
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Outermost ring first so inner rings draw over it
        for (color, canvas) in &self.layers.rings {
            Self::render_layer(canvas, ring_color(*color), area, buf);
        }
        Self::render_layer(&self.layers.ground_zero, Color::LightRed, area, buf);
        Self::render_layer(&self.layers.observer, Color::LightGreen, area, buf);

        let label_style = Style::default().fg(Color::White);
        for (lx, ly, text) in &self.layers.labels {
            if *ly >= area.height || *lx >= area.width {
                continue;
            }
            let (x, y) = (area.x + *lx, area.y + *ly);
            let max_len = area.width.saturating_sub(*lx) as usize;
            for (i, ch) in text.chars().take(max_len).enumerate() {
                buf[(x + i as u16, y)].set_char(ch).set_style(label_style);
            }
        }

        if let Some((cx, cy)) = self.cursor_pos {
            buf[(area.x + cx, area.y + cy)].set_char('╋').set_fg(Color::Red);
        }
    }
}

fn render_side_panel(frame: &mut Frame, app: &App, area: Rect) {
    let legend_height = app.profile().effects.len() as u16 * 2 + 2;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(legend_height),
            Constraint::Length(6),
            Constraint::Min(3),
        ])
        .split(area);

    render_legend(frame, app, sections[0]);
    render_situation(frame, app, sections[1]);
    if app.show_guidance {
        render_guidance(frame, app, sections[2]);
    }
}

fn render_legend(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.result.zone_name();
    let mut lines = Vec::new();
    for ring in app.profile().legend_order() {
        let marker_style = Style::default().fg(ring_color(ring.color));
        let name_style = if ring.name == current {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::styled("██ ", marker_style),
            Span::styled(ring.name.clone(), name_style),
            Span::styled(format!("  {:.2} km", ring.radius_m / 1000.0), Style::default().fg(Color::Yellow)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", ring.description),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Effect Legend (airburst) ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_situation(frame: &mut Frame, app: &App, area: Rect) {
    let zone_color = app.current_ring().map_or(Color::Green, |r| ring_color(r.color));
    let lines = vec![
        Line::from(vec![
            Span::styled("Distance: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:.2} km", app.result.distance_m / 1000.0),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![
            Span::styled("Zone: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.result.zone_name().to_string(),
                Style::default().fg(zone_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Ground zero: ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.detonation.to_string()),
        ]),
        Line::from(vec![
            Span::styled("You: ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.observer.to_string()),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Your Situation ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_guidance(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Safety Recommendations ");
    let paragraph = Paragraph::new(app.guidance_text())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Line::from(vec![
        Span::styled(" Scale: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.scale_label(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | Tab:bomb d/RMB:ground zero o:you f:fit g:guidance hjkl:pan +/-:zoom q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}
