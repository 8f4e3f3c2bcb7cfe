//! Clinical feature input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{ClinicalFeatures, FieldDomain, FieldSpec, FIELD_SPECS};
use crate::tui::styles::MedicalTheme;

/// One input control bound to a collector field.
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FieldSpec,
    /// Text buffer for numeric fields
    pub value: String,
    /// Selected option index for choice fields
    pub choice: usize,
}

impl FormField {
    fn new(spec: &'static FieldSpec) -> Self {
        let default = spec.default_value();
        match spec.domain {
            FieldDomain::Choice(options) => Self {
                spec,
                value: String::new(),
                choice: options.iter().position(|c| c.value == default).unwrap_or(0),
            },
            _ => Self {
                spec,
                value: format_number(&spec.domain, default),
                choice: 0,
            },
        }
    }

    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(self.spec.domain, FieldDomain::Choice(_))
    }

    /// Text shown in the control.
    #[must_use]
    pub fn display(&self) -> String {
        match self.spec.domain {
            FieldDomain::Choice(options) => options
                .get(self.choice)
                .map(|c| format!("< {} >", c.label))
                .unwrap_or_default(),
            _ => self.value.clone(),
        }
    }

    /// Accept a typed character if the control allows it.
    fn input_char(&mut self, c: char) -> bool {
        match self.spec.domain {
            FieldDomain::Integer { .. } if c.is_ascii_digit() => {
                self.value.push(c);
                true
            }
            FieldDomain::Decimal { .. } if c.is_ascii_digit() || (c == '.' && !self.value.contains('.')) => {
                self.value.push(c);
                true
            }
            FieldDomain::Choice(options) => {
                // Jump to the option whose label starts with the typed character.
                let typed = c.to_ascii_lowercase();
                match options.iter().position(|o| {
                    o.label
                        .chars()
                        .next()
                        .is_some_and(|first| first.to_ascii_lowercase() == typed)
                }) {
                    Some(idx) => {
                        self.choice = idx;
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// Move one step up or down. Numbers saturate at the bounds, choices wrap.
    fn step(&mut self, forward: bool) {
        match self.spec.domain {
            FieldDomain::Choice(options) => {
                let n = options.len();
                if n == 0 {
                    return;
                }
                self.choice = if forward {
                    (self.choice + 1) % n
                } else {
                    (self.choice + n - 1) % n
                };
            }
            domain => {
                let current = self
                    .value
                    .parse::<f64>()
                    .unwrap_or_else(|_| self.spec.default_value());
                let delta = if forward { domain.step() } else { -domain.step() };
                let next = domain.clamp(current + delta);
                self.value.zeroize();
                self.value = format_number(&domain, next);
            }
        }
    }

    /// Parse the control's value. Range checks happen in
    /// [`ClinicalFeatures::validate`].
    fn read(&self) -> Result<f64, String> {
        match self.spec.domain {
            FieldDomain::Choice(options) => options
                .get(self.choice)
                .map(|c| c.value)
                .ok_or_else(|| format!("{}: No option selected", self.spec.label)),
            _ => self
                .value
                .trim()
                .parse()
                .map_err(|_| format!("{}: Invalid number", self.spec.label)),
        }
    }
}

fn format_number(domain: &FieldDomain, value: f64) -> String {
    match domain {
        FieldDomain::Decimal { .. } => format!("{value:.1}"),
        _ => format!("{value:.0}"),
    }
}

/// Form state
pub struct FeatureFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for FeatureFormState {
    fn default() -> Self {
        Self {
            fields: FIELD_SPECS.iter().map(FormField::new).collect(),
            selected_field: 0,
            error_message: None,
        }
    }
}

impl FeatureFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        if self.fields[self.selected_field].input_char(c) {
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.zeroize();
    }

    /// Step the current field up (Right) or down (Left)
    pub fn increment(&mut self) {
        self.fields[self.selected_field].step(true);
        self.error_message = None;
    }

    pub fn decrement(&mut self) {
        self.fields[self.selected_field].step(false);
        self.error_message = None;
    }

    /// Wipe all field buffers from memory.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
            field.choice = 0;
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Wipe buffers and restore the initial values
    pub fn reset_defaults(&mut self) {
        self.clear_sensitive();
        *self = Self::default();
    }

    /// Validate and convert to ClinicalFeatures.
    ///
    /// Out-of-range values are rejected here, before any record is built.
    pub fn to_clinical_features(&self) -> Result<ClinicalFeatures, String> {
        let values = self
            .fields
            .iter()
            .map(FormField::read)
            .collect::<Result<Vec<f64>, String>>()?;

        let features = ClinicalFeatures::from_vec(&values)?;
        features.validate().map_err(|errors| errors.join("; "))?;
        Ok(features)
    }
}

/// Render the feature input form
pub fn render_feature_form(f: &mut Frame, area: Rect, state: &FeatureFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Cardiovascular Disease Risk Predictor", MedicalTheme::title()),
        Span::styled(
            " │ Enter patient details to assess risk of heart disease",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &FeatureFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.spec.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let shown = field.display();
        let value_display = if shown.is_empty() {
            Span::styled(field.spec.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(shown, MedicalTheme::text())
        };

        let mut spans = vec![Span::raw(" "), value_display];
        if is_selected && !field.is_choice() {
            spans.push(Span::styled("▌", MedicalTheme::cursor()));
        }
        spans.push(Span::styled(
            format!("  {}", field.spec.hint),
            MedicalTheme::text_muted(),
        ));

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FeatureFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Adjust ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[D] ", MedicalTheme::key_hint()),
            Span::styled("Defaults ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
