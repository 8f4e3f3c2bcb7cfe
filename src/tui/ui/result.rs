//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use crate::application::Evaluation;
use crate::domain::FeatureOrder;
use crate::tui::styles::MedicalTheme;

/// Render the outcome of the last prediction next to the normalized input.
pub fn render_result(f: &mut Frame, area: Rect, evaluation: &Evaluation, order: &FeatureOrder) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0], evaluation);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_decision(f, columns[0], evaluation);
    render_scaled_table(f, columns[1], evaluation, order);
    render_result_footer(f, chunks[2]);
}

fn render_result_header(f: &mut Frame, area: Rect, evaluation: &Evaluation) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Prediction", MedicalTheme::title()),
        Span::styled(
            " │ Logistic regression on standardized features",
            MedicalTheme::text_secondary(),
        ),
        Span::styled(
            format!(" │ {}", evaluation.decision.evaluated_at_text()),
            MedicalTheme::text_muted(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_decision(f: &mut Frame, area: Rect, evaluation: &Evaluation) {
    let decision = &evaluation.decision;

    let block = Block::default()
        .title(Span::styled(" Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Message
            Constraint::Length(4), // Probability
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let label_style = MedicalTheme::risk_label(decision.label);
    let icon = if decision.is_at_risk() { "!" } else { "OK" };

    let message = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{icon} {}", decision.label.headline()),
            label_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(decision.confidence_text(), MedicalTheme::text())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(message, chunks[0]);

    let p_disease = decision.probabilities.disease.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" P(disease), threshold {:.2} ", decision.threshold),
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(label_style)
        .ratio(p_disease)
        .label(format!("{:.2}%", p_disease * 100.0));
    f.render_widget(gauge, chunks[1]);
}

fn render_scaled_table(f: &mut Frame, area: Rect, evaluation: &Evaluation, order: &FeatureOrder) {
    let rows: Vec<Row> = order
        .iter()
        .zip(&evaluation.scaled)
        .map(|(name, value)| {
            Row::new(vec![
                Cell::from(Span::styled(name.as_str(), MedicalTheme::text_secondary())),
                Cell::from(Span::styled(format!("{value:>8.4}"), MedicalTheme::text())),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(8)])
        .header(
            Row::new(vec!["Feature", "Scaled"])
                .style(MedicalTheme::focused())
                .bottom_margin(1),
        )
        .block(
            Block::default()
                .title(Span::styled(" Normalized Input ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );

    f.render_widget(table, area);
}

fn render_result_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled("Back to Form ", MedicalTheme::key_desc()),
        Span::styled("[N] ", MedicalTheme::key_hint()),
        Span::styled("New Patient ", MedicalTheme::key_desc()),
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
