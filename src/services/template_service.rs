use crate::errors::AppError;
use crate::models::deck::{Align, Deck, Shape, TextFrame};
use crate::models::report::ReportFields;
use tracing::warn;

const WHITE: &str = "FFFFFF";

/// Where the chart lands on the first slide, in inches.
const CHART_BOUNDS: (f32, f32, f32, f32) = (-0.4, 0.7, 7.7, 3.9);

/// Rows of the financial table on slide 0, top to bottom after the header.
const TABLE_ROWS: usize = 5;
const TABLE_COLUMNS: usize = 3;

/// Presentation formatting attached to a placeholder's shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleRule {
    pub align: Option<Align>,
    pub font_size: Option<f32>,
    pub color: Option<&'static str>,
}

type FieldAccessor = fn(&ReportFields) -> String;

/// One placeholder: the literal token, the slide it lives on (`None` = any
/// slide), whether the template must contain it, the style applied to its
/// shape, and the report field that replaces it.
pub struct Binding {
    pub token: &'static str,
    pub slide: Option<usize>,
    pub required: bool,
    pub style: Option<StyleRule>,
    accessor: FieldAccessor,
}

/// The full placeholder inventory, in application order. Longer tokens that
/// contain shorter ones (`date_next_event1` vs `next_event1`) come first, and
/// free-text fills (description, news) come after the short tokens that could
/// otherwise match inside the inserted prose.
pub fn bindings() -> Vec<Binding> {
    let style_40pt = StyleRule { font_size: Some(40.0), ..StyleRule::default() };

    vec![
        Binding {
            token: "shortName",
            slide: None,
            required: true,
            style: Some(StyleRule {
                align: Some(Align::Center),
                color: Some(WHITE),
                ..StyleRule::default()
            }),
            accessor: |f| f.short_name.clone(),
        },
        Binding {
            token: "overall",
            slide: Some(0),
            required: true,
            style: None,
            accessor: |f| f.ratios.overall.clone(),
        },
        Binding {
            token: "5y",
            slide: Some(0),
            required: true,
            style: None,
            accessor: |f| f.ratios.five_year.clone(),
        },
        Binding {
            token: "3y",
            slide: Some(0),
            required: true,
            style: None,
            accessor: |f| f.ratios.three_year.clone(),
        },
        Binding {
            token: "description",
            slide: Some(0),
            required: true,
            style: Some(StyleRule {
                align: Some(Align::Justify),
                font_size: Some(9.0),
                ..StyleRule::default()
            }),
            accessor: |f| f.description.clone(),
        },
        Binding {
            token: "total-esg",
            slide: Some(1),
            required: true,
            style: Some(style_40pt),
            accessor: |f| f.total_esg.clone(),
        },
        Binding {
            token: "month",
            slide: Some(1),
            required: true,
            style: None,
            accessor: |f| f.rating_month.clone(),
        },
        Binding {
            token: "year",
            slide: Some(1),
            required: true,
            style: None,
            accessor: |f| f.rating_year.clone(),
        },
        Binding {
            token: "level_contro",
            slide: Some(1),
            required: true,
            style: Some(style_40pt),
            accessor: |f| f.controversy_level.clone(),
        },
        Binding {
            token: "related_contro",
            slide: Some(1),
            required: true,
            style: None,
            accessor: |f| f.related_controversies.clone(),
        },
        Binding {
            token: "news",
            slide: Some(1),
            required: true,
            style: None,
            accessor: |f| f.news_lines.join("\n"),
        },
        Binding {
            token: "price_consensus",
            slide: Some(2),
            required: true,
            style: None,
            accessor: |f| f.consensus_line.clone(),
        },
        Binding {
            token: "reco_key",
            slide: Some(2),
            required: true,
            style: Some(style_40pt),
            accessor: |f| f.recommendation_key.clone(),
        },
        Binding {
            token: "upside_downside",
            slide: Some(2),
            required: true,
            style: Some(style_40pt),
            accessor: |f| f.upside_downside.clone(),
        },
        Binding {
            token: "date_next_event1",
            slide: Some(2),
            required: false,
            style: None,
            accessor: |f| calendar_date(f, 0),
        },
        Binding {
            token: "date_next_event2",
            slide: Some(2),
            required: false,
            style: None,
            accessor: |f| calendar_date(f, 1),
        },
        Binding {
            token: "date_next_event3",
            slide: Some(2),
            required: false,
            style: None,
            accessor: |f| calendar_date(f, 2),
        },
        Binding {
            token: "next_event1",
            slide: Some(2),
            required: false,
            style: None,
            accessor: |f| calendar_name(f, 0),
        },
        Binding {
            token: "next_event2",
            slide: Some(2),
            required: false,
            style: None,
            accessor: |f| calendar_name(f, 1),
        },
        Binding {
            token: "next_event3",
            slide: Some(2),
            required: false,
            style: None,
            accessor: |f| calendar_name(f, 2),
        },
    ]
}

fn calendar_name(fields: &ReportFields, index: usize) -> String {
    fields
        .calendar_entries
        .get(index)
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| "N/A".to_string())
}

fn calendar_date(fields: &ReportFields, index: usize) -> String {
    fields
        .calendar_entries
        .get(index)
        .map(|(_, date)| date.clone())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Checks the template's shape inventory against the binding table before
/// anything is written, so a stale template fails fast instead of silently
/// keeping placeholder text.
pub fn validate_bindings(deck: &Deck) -> Result<(), AppError> {
    let missing: Vec<&str> = bindings()
        .iter()
        .filter(|b| b.required && !token_present(deck, b))
        .map(|b| b.token)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Template(format!(
            "template is missing required placeholders: {}",
            missing.join(", ")
        )))
    }
}

fn token_present(deck: &Deck, binding: &Binding) -> bool {
    deck.slides
        .iter()
        .enumerate()
        .filter(|(i, _)| binding.slide.map_or(true, |s| s == *i))
        .flat_map(|(_, slide)| &slide.shapes)
        .filter_map(|shape| shape.text_frame.as_ref())
        .any(|tf| tf.text.contains(binding.token))
}

/// Applies the report to the deck in place: company-profile substitutions
/// first (as the source template expects), then the binding table, then the
/// financial table cells and the chart picture.
pub fn fill(deck: &mut Deck, fields: &ReportFields) {
    // Global profile pass. shortName is excluded here because its binding
    // also styles the shape it lands on.
    for (token, value) in &fields.profile_substitutions {
        if token == "shortName" {
            continue;
        }
        replace_token(deck, None, token, value, None);
    }

    for binding in bindings() {
        let value = (binding.accessor)(fields);
        replace_token(deck, binding.slide, binding.token, &value, binding.style);
    }

    fill_financial_table(deck, fields);

    if let Some(chart) = &fields.chart_path {
        if let Some(slide) = deck.slides.first_mut() {
            let (x, y, w, h) = CHART_BOUNDS;
            slide
                .shapes
                .push(Shape::picture(&chart.to_string_lossy(), x, y, w, h));
        }
    }
}

/// Substring replacement of `token` in every text frame in scope. A token may
/// sit inside surrounding text; only the token itself is replaced.
fn replace_token(
    deck: &mut Deck,
    slide_scope: Option<usize>,
    token: &str,
    value: &str,
    style: Option<StyleRule>,
) {
    for (i, slide) in deck.slides.iter_mut().enumerate() {
        if let Some(scope) = slide_scope {
            if scope != i {
                continue;
            }
        }
        for shape in &mut slide.shapes {
            let Some(tf) = shape.text_frame.as_mut() else { continue };
            if !tf.text.contains(token) {
                continue;
            }
            tf.text = tf.text.replace(token, value);
            if let Some(rule) = style {
                apply_style(tf, rule);
            }
        }
    }
}

fn apply_style(tf: &mut TextFrame, rule: StyleRule) {
    if let Some(align) = rule.align {
        tf.align = Some(align);
    }
    if let Some(size) = rule.font_size {
        tf.font_size = Some(size);
    }
    if let Some(color) = rule.color {
        tf.color = Some(color.to_string());
    }
}

/// Writes the metric rows into the first table shape of slide 0. Row 0 and
/// column 0 are the template's own headers.
fn fill_financial_table(deck: &mut Deck, fields: &ReportFields) {
    let Some(slide) = deck.slides.first_mut() else { return };
    let Some(table) = slide.shapes.iter_mut().find_map(|s| s.table.as_mut()) else {
        warn!("no financial table shape on slide 0, skipping cell writes");
        return;
    };

    let rows: [&[String; 3]; TABLE_ROWS] = [
        &fields.revenue,
        &fields.ebitda,
        &fields.ebit,
        &fields.leverage,
        &fields.eps,
    ];
    for (r, values) in rows.iter().enumerate() {
        for c in 0..TABLE_COLUMNS {
            if !table.set_cell(r + 1, c + 1, values[c].clone()) {
                warn!(row = r + 1, col = c + 1, "financial table smaller than expected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deck::{Slide, Table};
    use crate::models::report::RatioSet;

    fn text_shape(text: &str) -> Shape {
        Shape {
            text_frame: Some(TextFrame {
                text: text.to_string(),
                ..TextFrame::default()
            }),
            ..Shape::default()
        }
    }

    fn template() -> Deck {
        Deck {
            slides: vec![
                Slide {
                    shapes: vec![
                        text_shape("shortName"),
                        text_shape("Overall: overall | 5Y: 5y | 3Y: 3y"),
                        text_shape("description"),
                        Shape {
                            table: Some(Table {
                                cells: vec![vec![String::new(); 4]; 6],
                            }),
                            ..Shape::default()
                        },
                    ],
                },
                Slide {
                    shapes: vec![
                        text_shape("total-esg"),
                        text_shape("month"),
                        text_shape("year"),
                        text_shape("level_contro"),
                        text_shape("related_contro"),
                        text_shape("news"),
                    ],
                },
                Slide {
                    shapes: vec![
                        text_shape("price_consensus"),
                        text_shape("reco_key"),
                        text_shape("upside_downside"),
                        text_shape("next_event1"),
                        text_shape("date_next_event1"),
                    ],
                },
            ],
        }
    }

    fn fields() -> ReportFields {
        ReportFields {
            short_name: "ACME".to_string(),
            description: "Maker of everything.".to_string(),
            profile_substitutions: vec![("sector".to_string(), "Industrials".to_string())],
            ratios: RatioSet {
                overall: "8.00%".to_string(),
                five_year: "6.00%".to_string(),
                three_year: "4.00%".to_string(),
            },
            revenue: ["12,345".into(), "11,000".into(), "N/A".into()],
            ebitda: ["2,000".into(), "1,900".into(), "1,800".into()],
            ebit: ["1,500".into(), "1,400".into(), "N/A".into()],
            leverage: ["2.5x".into(), "N/A".into(), "N/A".into()],
            eps: ["3.14".into(), "2.5".into(), "N/A".into()],
            total_esg: "21.4".to_string(),
            rating_month: "3".to_string(),
            rating_year: "2024".to_string(),
            controversy_level: "2".to_string(),
            related_controversies: "A\nB".to_string(),
            news_lines: vec!["2025-03-01 - headline".to_string()],
            calendar_entries: vec![("Earnings Date".to_string(), "2025-07-24".to_string())],
            consensus_line: "low 90.0, mean 120.0, high 150.0".to_string(),
            recommendation_key: "buy".to_string(),
            upside_downside: "20.0%".to_string(),
            chart_path: Some(std::path::PathBuf::from("ACME_chart.png")),
        }
    }

    #[test]
    fn validation_passes_on_a_complete_template() {
        assert!(validate_bindings(&template()).is_ok());
    }

    #[test]
    fn validation_names_every_missing_required_token() {
        let mut deck = template();
        deck.slides[0].shapes.remove(1); // drops the ratio placeholders
        let err = validate_bindings(&deck).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("overall"), "got: {message}");
        assert!(message.contains("5y"), "got: {message}");
        assert!(message.contains("3y"), "got: {message}");
    }

    #[test]
    fn tokens_are_replaced_as_substrings() {
        let mut deck = template();
        fill(&mut deck, &fields());
        let ratio_text = &deck.slides[0].shapes[1].text_frame.as_ref().unwrap().text;
        assert_eq!(ratio_text, "Overall: 8.00% | 5Y: 6.00% | 3Y: 4.00%");
    }

    #[test]
    fn short_name_shape_is_centered_and_recolored() {
        let mut deck = template();
        fill(&mut deck, &fields());
        let tf = deck.slides[0].shapes[0].text_frame.as_ref().unwrap();
        assert_eq!(tf.text, "ACME");
        assert_eq!(tf.align, Some(Align::Center));
        assert_eq!(tf.color.as_deref(), Some("FFFFFF"));
    }

    #[test]
    fn financial_table_cells_are_written_at_fixed_positions() {
        let mut deck = template();
        fill(&mut deck, &fields());
        let table = deck.slides[0].shapes[3].table.as_ref().unwrap();
        assert_eq!(table.cells[1][1], "12,345");
        assert_eq!(table.cells[4][1], "2.5x");
        assert_eq!(table.cells[5][3], "N/A");
        // header row and column untouched
        assert_eq!(table.cells[0][0], "");
    }

    #[test]
    fn news_frame_gets_one_paragraph_per_item_and_chart_is_inserted() {
        let mut deck = template();
        fill(&mut deck, &fields());
        let news = &deck.slides[1].shapes[5].text_frame.as_ref().unwrap().text;
        assert_eq!(news, "2025-03-01 - headline");
        let picture = deck.slides[0].shapes.last().unwrap().picture.as_ref().unwrap();
        assert_eq!(picture.path, "ACME_chart.png");
    }

    #[test]
    fn missing_calendar_entries_degrade_to_na() {
        let mut deck = template();
        let mut f = fields();
        f.calendar_entries.clear();
        fill(&mut deck, &f);
        let name = &deck.slides[2].shapes[3].text_frame.as_ref().unwrap().text;
        assert_eq!(name, "N/A");
    }
}
