use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};
use crate::app::{App, InputMode};
use crate::catalog::{self, format_price};
use crate::chat::ChatRole;
use crate::view::ViewState;

const BRAND: Color = Color::Green;
const ACCENT: Color = Color::Yellow;

const FEATURES: &[(&str, &str)] = &[
    ("No Preservatives", "100% natural processing ensures you drink only what nature intended."),
    ("Garden Fresh", "Sourced directly from the finest estates in Assam during the prime harvest."),
    ("Health First", "Rich in antioxidants and packed with health benefits for your daily routine."),
];

const HERITAGE: &[&str] = &[
    "Lailpuriya was born from a simple promise: to bring the authentic, unadulterated taste of Assam tea to the world.",
    "Nestled in the lush, rain-fed plains of Northeast India, our gardens have been cultivated for generations. We believe in the power of nature. That's why our processing involves absolutely **no preservatives**. From plucking the two leaves and a bud to the final drying process, every step is monitored to ensure purity.",
    "When you sip Lailpuriya, you aren't just drinking tea; you are tasting the mist, the soil, and the soul of Assam.",
];

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };

        if start > 0 {
            spans.push(Span::raw(rest[..start].to_string()));
        }
        let bold = &after[..end];
        if bold.is_empty() {
            spans.push(Span::raw("****"));
        } else {
            spans.push(Span::styled(
                bold.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        rest = &after[end + 2..];
    }

    // Remaining text, including any unclosed ** literally
    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

/// Centered popup rectangle clamped to the frame
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let view_area = if app.views.is_chat_open() {
        let [view_area, chat_area] = Layout::horizontal([
            Constraint::Percentage(55),
            Constraint::Percentage(45),
        ])
        .areas(body_area);
        render_chat_panel(app, frame, chat_area);
        view_area
    } else {
        body_area
    };

    match app.views.view() {
        ViewState::Home => render_home(frame, view_area),
        ViewState::Shop => render_shop(app, frame, view_area),
        ViewState::About => render_about(frame, view_area),
    }

    render_footer(app, frame, footer_area);

    // Overlays (in order of priority)
    if app.views.is_cart_open() {
        render_cart_drawer(app, frame, body_area);
    }
    if app.show_api_key_input {
        render_api_key_input(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" LAILPURIYA ", Style::default().fg(ACCENT).bold()),
        Span::raw(" "),
    ];

    for (idx, view) in ViewState::all().into_iter().enumerate() {
        let label = format!(" {} {} ", idx + 1, view.title());
        let style = if view == app.views.view() {
            Style::default().fg(Color::Black).bg(BRAND).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
    }

    let count = app.cart.cart_count();
    let badge_style = if count > 0 {
        Style::default().fg(Color::Black).bg(ACCENT).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    spans.push(Span::raw("  "));
    spans.push(Span::styled(format!(" Cart ({}) ", count), badge_style));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = if app.show_api_key_input {
        (" API KEY ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        match app.input_mode {
            InputMode::Normal => (" BROWSE ", Style::default().bg(Color::Blue).fg(Color::White)),
            InputMode::Editing => (" CHAT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
        }
    };

    let hints = if let Some(status) = &app.status {
        status.clone()
    } else if app.show_api_key_input {
        "Enter: save key  Esc: cancel".to_string()
    } else if app.input_mode == InputMode::Editing {
        "Enter: send  Esc: stop typing  Ctrl-C: quit".to_string()
    } else if app.views.is_cart_open() {
        "j/k: select  +/-: quantity  x: remove  Enter: checkout  c/Esc: close".to_string()
    } else if app.views.view() == ViewState::Shop {
        "1/2/3: view  j/k: select  Enter/a: add to cart  c: cart  t: sommelier  q: quit".to_string()
    } else {
        "1/2/3: view  Enter: shop  c: cart  t: sommelier  q: quit".to_string()
    };

    let footer = Line::from(vec![
        Span::styled(mode_text, mode_style),
        Span::raw(" "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}

fn render_home(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Home ");

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled("  100% Preservative Free", Style::default().fg(BRAND))),
        Line::default(),
        Line::from(Span::styled("  Pure Assam Tea, From Our Garden to Your Cup", Style::default().fg(Color::White).bold())),
        Line::default(),
        Line::from(
            "  Experience the robust, malty flavor of Lailpuriya. Hand-picked, carefully processed, \
             and delivered straight to your doorstep without a single additive.",
        ),
        Line::default(),
        Line::from(Span::styled("  [Enter] Shop Collections", Style::default().fg(ACCENT).bold())),
        Line::default(),
    ];

    for (title, desc) in FEATURES {
        lines.push(Line::from(Span::styled(format!("  * {}", title), Style::default().fg(BRAND).bold())));
        lines.push(Line::from(Span::styled(format!("    {}", desc), Style::default().fg(Color::Gray))));
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled(
        "  \"The truest taste of Assam\"",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let home = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(home, area);
}

fn render_shop(app: &mut App, frame: &mut Frame, area: Rect) {
    let [list_area, detail_area] = Layout::horizontal([
        Constraint::Percentage(45),
        Constraint::Percentage(55),
    ])
    .areas(area);

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Our Collection ");

    let items: Vec<ListItem> = catalog::all()
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(p.accent_color)),
                Span::raw(format!("{} ({}) ", p.name, p.size)),
                Span::styled(format_price(p.price), Style::default().fg(ACCENT)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(list_block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, list_area, &mut app.shop_state);

    let detail_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Details ");

    let Some(product) = app.selected_product() else {
        frame.render_widget(detail_block, detail_area);
        return;
    };

    let in_cart = app.cart.get(product.id).map(|i| i.quantity).unwrap_or(0);
    let mut lines = vec![
        Line::from(Span::styled(product.name, Style::default().fg(product.accent_color).bold())),
        Line::from(Span::styled(product.size, Style::default().fg(Color::Gray))),
        Line::default(),
        Line::from(product.description),
        Line::default(),
        Line::from(Span::styled(format_price(product.price), Style::default().fg(ACCENT).bold())),
        Line::default(),
        Line::from(Span::styled("[Enter] Add to cart", Style::default().fg(BRAND))),
    ];
    if in_cart > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} in your cart", in_cart),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let detail = Paragraph::new(lines).block(detail_block).wrap(Wrap { trim: true });
    frame.render_widget(detail, detail_area);
}

fn render_about(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Our Heritage ");

    let mut lines = vec![Line::default()];
    for paragraph in HERITAGE {
        lines.push(parse_markdown_line(paragraph));
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled("[Enter] Taste the Purity", Style::default().fg(ACCENT).bold())));

    let about = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(about, area);
}

fn render_cart_drawer(app: &mut App, frame: &mut Frame, area: Rect) {
    let width = 52.min(area.width);
    let drawer_area = Rect::new(area.x + area.width - width, area.y, width, area.height);

    // Clear the area behind the drawer
    frame.render_widget(Clear, drawer_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Your Cart ");

    let inner = block.inner(drawer_area);
    frame.render_widget(block, drawer_area);

    let [items_area, total_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(4),
    ])
    .areas(inner);

    if app.cart.is_empty() {
        let empty = Paragraph::new("Your cart is empty").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, items_area);
    } else {
        let items: Vec<ListItem> = app
            .cart
            .items()
            .iter()
            .map(|item| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled("■ ", Style::default().fg(item.product.accent_color)),
                        Span::styled(item.product.name, Style::default().bold()),
                        Span::styled(format!(" {}", item.product.size), Style::default().fg(Color::Gray)),
                    ]),
                    Line::from(vec![
                        Span::styled(format!("  {}", format_price(item.product.price)), Style::default().fg(ACCENT)),
                        Span::raw(format!("  [-] {} [+]", item.quantity)),
                        Span::styled(format!("  = {}", format_price(item.line_total())), Style::default().fg(Color::Gray)),
                    ]),
                ])
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, items_area, &mut app.cart_state);
    }

    let checkout_style = if app.cart.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(ACCENT).bold()
    };

    let total = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("TOTAL ", Style::default().fg(BRAND)),
            Span::styled(format_price(app.cart.cart_total()), Style::default().fg(Color::White).bold()),
        ]),
        Line::default(),
        Line::from(Span::styled(" Checkout Now ", checkout_style)),
    ])
    .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(Color::DarkGray)));

    frame.render_widget(total, total_area);
}

fn render_chat_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing && !app.show_api_key_input;

    let [transcript_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::DarkGray } else { Color::Cyan }))
        .title(" Tea Sommelier ");

    let inner = block.inner(transcript_area);
    app.chat_height = inner.height;
    app.chat_width = inner.width;

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.chat.transcript() {
        let (label, color) = match msg.role {
            ChatRole::User => ("You:", Color::Cyan),
            ChatRole::Assistant => ("Sommelier:", BRAND),
        };
        lines.push(Line::from(Span::styled(label, Style::default().fg(color).bold())));
        for line in msg.text.lines() {
            lines.push(parse_markdown_line(line));
        }
        lines.push(Line::default());
    }

    if app.chat.is_in_flight() {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        lines.push(Line::from(Span::styled("Sommelier:", Style::default().fg(BRAND).bold())));
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let total_lines = lines.len();
    let transcript = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(transcript, transcript_area);

    if total_lines > inner.height as usize {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));
        let mut scrollbar_state = ScrollbarState::new(total_lines).position(app.chat_scroll as usize);
        frame.render_stateful_widget(
            scrollbar,
            transcript_area.inner(Margin { vertical: 1, horizontal: 0 }),
            &mut scrollbar_state,
        );
    }

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { ACCENT } else { Color::DarkGray }))
        .title(" Ask about our tea... ");

    let input = Paragraph::new(app.chat_input.as_str())
        .style(Style::default().fg(Color::White))
        .block(input_block);
    frame.render_widget(input, input_area);

    if editing {
        let cursor_x = app.chat_cursor.min(input_area.width.saturating_sub(3) as usize) as u16;
        frame.set_cursor_position((input_area.x + 1 + cursor_x, input_area.y + 1));
    }
}

fn render_api_key_input(app: &App, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(area, 60, 7);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Enter Gemini API Key ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let instructions = Paragraph::new("The sommelier needs an API key. Enter to save, Esc to cancel.")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(instructions, Rect::new(inner.x, inner.y, inner.width, 1));

    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
    frame.render_widget(
        Paragraph::new(mask_key(&app.api_key_input)).style(Style::default().fg(Color::Cyan)),
        input_area,
    );

    let cursor_x = app.api_key_input_cursor.min(input_area.width as usize) as u16;
    frame.set_cursor_position((input_area.x + cursor_x, input_area.y));

    let status = Paragraph::new(format!("{} characters", app.api_key_input.chars().count()))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, Rect::new(inner.x, inner.y + 4, inner.width, 1));
}

/// Mask all but the last four characters of a key
fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let masked_len = len - 4;
    let last_four: String = key.chars().skip(masked_len).collect();
    format!("{}...{}", "*".repeat(masked_len.min(20)), last_four)
}
