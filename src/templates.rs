use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;

pub type Hbs = Arc<Handlebars<'static>>;

const MESSAGES: &[(&str, &str)] = &[
    ("messages/pong", "Pong!"),
    (
        "messages/alert_created",
        "✅ Alert saved for {{symbol}} at {{threshold}} {{quote}} ({{action}}) for <@{{user_id}}>!",
    ),
    (
        "messages/alert_list",
        "🔔 Your active alerts:\n{{#each alerts}}{{this.symbol}}: {{this.threshold}} {{../quote}} - Action: {{this.action}}\n{{/each}}",
    ),
    ("messages/no_alerts", "❌ You have no active alerts."),
    (
        "messages/alert_removed",
        "✅ Removed {{count}} alert(s) for {{symbol}} at {{threshold}} {{quote}} ({{action}}).",
    ),
    ("messages/alert_not_found", "❌ No matching alert found."),
    ("messages/dismissed", "❌ No alert removed."),
    (
        "messages/alert_fired",
        "🚨 <@{{user_id}}> - Current {{symbol}} price: {{price}} {{quote}}\nAction to take: {{label}}",
    ),
    (
        "buttons/remove",
        "Remove {{symbol}}: {{threshold}} {{quote}} - Action: {{action}}",
    ),
    ("buttons/dismiss", "Remove nothing"),
];

pub fn build_handlebars() -> Hbs {
    let mut hb = Handlebars::new();

    // chat messages are plain text
    hb.register_escape_fn(handlebars::no_escape);

    for (name, tpl) in MESSAGES {
        hb.register_template_string(name, tpl)
            .unwrap_or_else(|e| panic!("template {name}: {e}"));
    }

    Arc::new(hb)
}

pub fn render<T: Serialize>(hbs: &Hbs, tpl: &str, ctx: &T) -> String {
    hbs.render(tpl, ctx)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|e| format!("template error: {e}"))
}
