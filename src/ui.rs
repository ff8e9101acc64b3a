use crate::models::{BestQuote, Moment, QuickStats};
use crate::pages::{BestOfView, LeaderboardView, MemberCard, PagelleView, CATEGORIES};
use crate::query::YearFilter;
use crate::stats::{ArchiveOverview, Bar, GradeBand, HistoryView, LiderView, Podium, TrendDirection};
use crate::view::{ViewState, WeekStep};
use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
];
const WEEKDAY_LABELS: [&str; 7] = ["Lun", "Mar", "Mer", "Gio", "Ven", "Sab", "Dom"];

const NAV: [(&str, &str); 8] = [
    ("/", "Home"),
    ("/classifica", "Classifica"),
    ("/archivio", "Archivio"),
    ("/best-of", "Best Of"),
    ("/pagelle", "Pagelle"),
    ("/membri", "Membri"),
    ("/lider", "Lider"),
    ("/storia", "Storia"),
];

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// `2025-01-05` becomes `5 gen 2025`; anything unparsable is shown as is.
pub fn format_date(raw: &str) -> String {
    let head = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(head, "%Y-%m-%d") {
        Ok(date) => format!("{} {} {}", date.day(), MONTHS[date.month0() as usize], date.year()),
        Err(_) => raw.to_string(),
    }
}

pub fn category_label(category: &str) -> &str {
    match category {
        "battute" => "Battuta Top",
        "fails" => "Epic Fail",
        "quotes" => "Citazione",
        "momenti" => "Momento Storico",
        other => other,
    }
}

fn placeholder(lines: &[&str]) -> String {
    let mut out = String::from(r#"<div class="loading">"#);
    for line in lines {
        out.push_str(&format!("<p>{}</p>", escape(line)));
    }
    out.push_str("</div>");
    out
}

fn medal(rank: usize, podium: Option<Podium>) -> String {
    match podium {
        Some(Podium::Gold) => "🥇".to_string(),
        Some(Podium::Silver) => "🥈".to_string(),
        Some(Podium::Bronze) => "🥉".to_string(),
        None => rank.to_string(),
    }
}

fn stat_card(value: &str, label: &str) -> String {
    format!(
        r#"<div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">{}</div></div>"#,
        escape(value),
        escape(label)
    )
}

fn bar_chart(bars: &[Bar], labels: impl Fn(usize) -> String) -> String {
    let mut out = String::from(r#"<div class="chart">"#);
    for (index, bar) in bars.iter().enumerate() {
        out.push_str(&format!(
            r#"<div class="bar-vertical" title="{value}"><div class="bar-vertical-fill" style="height: {percent:.1}%"></div><span class="bar-vertical-label">{label}</span></div>"#,
            value = bar.value,
            percent = bar.percent,
            label = escape(&labels(index)),
        ));
    }
    out.push_str("</div>");
    out
}

fn year_select(action: &str, selected: YearFilter, years: &[i32]) -> String {
    let mut out = format!(
        r#"<form class="year-select" method="get" action="{action}"><select name="anno" onchange="this.form.submit()">"#
    );
    let all_selected = if selected == YearFilter::All { " selected" } else { "" };
    out.push_str(&format!(r#"<option value="all"{all_selected}>Sempre</option>"#));
    for year in years.iter().rev() {
        let mark = if selected == YearFilter::Year(*year) { " selected" } else { "" };
        out.push_str(&format!(r#"<option value="{year}"{mark}>{year}</option>"#));
    }
    out.push_str("</select><noscript><button>Vai</button></noscript></form>");
    out
}

pub fn render_page(title: &str, active: &str, body: &str) -> String {
    let nav: String = NAV
        .iter()
        .map(|(href, label)| {
            let class = if *href == active { r#" class="active""# } else { "" };
            format!(r#"<a href="{href}"{class}>{label}</a>"#)
        })
        .collect();
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape(title))
        .replace("{{NAV}}", &nav)
        .replace("{{BODY}}", body)
}

pub fn render_home(stats: Option<&QuickStats>) -> String {
    let cards = match stats {
        Some(stats) => [
            stat_card(&format_number(stats.total_messages), "Messaggi"),
            stat_card(&stats.total_members.to_string(), "Membri"),
            stat_card(&stats.most_active, "Più attivo"),
            stat_card(&format_date(&stats.last_update), "Ultimo aggiornamento"),
        ],
        None => [
            stat_card("?", "Messaggi"),
            stat_card("?", "Membri"),
            stat_card("?", "Più attivo"),
            stat_card("Mai", "Ultimo aggiornamento"),
        ],
    };
    let body = format!(
        r#"<section id="quick-stats" class="stats-grid">{}</section>"#,
        cards.concat()
    );
    render_page("AperiPoker", "/", &body)
}

pub fn render_classifica(view: Option<&LeaderboardView>, year: YearFilter, years: &[i32]) -> String {
    let mut body = year_select("/classifica", year, years);
    let Some(view) = view else {
        body.push_str(&placeholder(&[
            "Nessun dato disponibile.",
            "Esegui il parser WhatsApp per popolare la classifica.",
        ]));
        return render_page("Classifica", "/classifica", &body);
    };

    body.push_str(r#"<section class="stats-grid">"#);
    body.push_str(&stat_card(&format_number(view.stats.total_messages), "Messaggi"));
    body.push_str(&stat_card(&view.stats.total_members.to_string(), "Membri"));
    body.push_str(&stat_card(&view.stats.mvp, "MVP"));
    body.push_str("</section>");

    body.push_str(r#"<section id="leaderboard">"#);
    for entry in &view.entries {
        let class = match entry.podium {
            Some(Podium::Gold) => " top-1",
            Some(Podium::Silver) => " top-2",
            Some(Podium::Bronze) => " top-3",
            None => "",
        };
        body.push_str(&format!(
            r#"<div class="leaderboard-item{class}"><span class="rank">{medal}</span><span class="member-name">{name}</span><div class="bar"><div class="bar-fill" style="width: {percent:.1}%"></div></div><span class="message-count">{count} messaggi</span></div>"#,
            medal = medal(entry.rank, entry.podium),
            name = escape(&entry.name),
            percent = entry.bar_percent,
            count = format_number(entry.message_count),
        ));
    }
    body.push_str("</section>");

    body.push_str("<h2>Attività per ora</h2>");
    body.push_str(&bar_chart(&view.hourly, |hour| format!("{hour:02}")));
    body.push_str("<h2>Attività per giorno</h2>");
    body.push_str(&bar_chart(&view.daily, |day| WEEKDAY_LABELS[day % 7].to_string()));

    render_page("Classifica", "/classifica", &body)
}

pub fn render_archivio(view: Option<&ArchiveOverview>) -> String {
    let Some(view) = view else {
        let body = placeholder(&[
            "Archivio non disponibile.",
            "Esegui il parser WhatsApp per generare i dati storici.",
        ]);
        return render_page("Archivio", "/archivio", &body);
    };

    let mut body = String::from(r#"<section class="stats-grid">"#);
    body.push_str(&stat_card(&format_number(view.total_messages), "Messaggi totali"));
    body.push_str(&stat_card(&view.total_years.to_string(), "Anni"));
    let peak = view.peak_year.map(|y| y.to_string()).unwrap_or_default();
    body.push_str(&stat_card(&peak, "Anno record"));
    let mvp = view.all_time_mvp.as_ref().map(|m| m.name.as_str()).unwrap_or("");
    body.push_str(&stat_card(mvp, "MVP di sempre"));
    body.push_str("</section>");

    body.push_str(r#"<div id="yearly-trend-chart" class="chart">"#);
    for bar in &view.trend_bars {
        let current = if bar.current { " current" } else { "" };
        body.push_str(&format!(
            r#"<div class="bar-vertical"><div class="bar-vertical-fill{current}" style="height: {:.1}%"></div><span class="bar-vertical-label">{}</span></div>"#,
            bar.height_percent, bar.year
        ));
    }
    body.push_str("</div>");

    body.push_str(r#"<section id="archivio-grid" class="card-grid">"#);
    for card in &view.cards {
        let trend_class = match card.trend {
            TrendDirection::Positive => "positive",
            TrendDirection::Negative => "negative",
            TrendDirection::Flat => "",
        };
        let (current_class, badge) = if card.current {
            (" current", r#"<span class="archivio-card-badge">In corso</span>"#)
        } else {
            ("", "")
        };
        let highlight = card
            .highlights
            .as_deref()
            .map(|h| format!(r#"<p class="archivio-highlight">{}</p>"#, escape(h)))
            .unwrap_or_default();
        body.push_str(&format!(
            r#"<a class="archivio-card{current_class}" href="/classifica?anno={year}"><div class="archivio-card-header"><div class="archivio-card-year">{year}</div>{badge}</div><div class="archivio-card-body"><p>Messaggi: <strong>{messages}</strong></p><p>MVP: <strong>{mvp}</strong></p><p>Trend: <strong class="archivio-trend {trend_class}">{trend}</strong></p>{highlight}</div></a>"#,
            year = card.year,
            messages = format_number(card.total_messages),
            mvp = escape(&card.mvp),
            trend = escape(&card.trend_label),
        ));
    }
    body.push_str("</section>");

    render_page("Archivio", "/archivio", &body)
}

fn moment_item(moment: &Moment) -> String {
    let date = moment.date.as_deref().map(format_date).unwrap_or_default();
    format!(
        r#"<div class="best-of-item"><p class="quote">"{quote}"</p><p><span class="author">— {author}</span> <span class="date">{date}</span></p><span class="category-tag">{label}</span></div>"#,
        quote = escape(&moment.quote),
        author = escape(&moment.author),
        date = escape(&date),
        label = escape(category_label(&moment.category)),
    )
}

pub fn render_best_of(view: Option<&BestOfView>, selection: &ViewState, years: &[i32]) -> String {
    let year = selection.year();
    let category = selection.category();
    let mut body = year_select("/best-of", year, years);
    let Some(view) = view else {
        body.push_str(&placeholder(&[
            "Nessun momento epico registrato.",
            "Esegui l'agente best-of per scoprire i momenti migliori.",
        ]));
        return render_page("Best Of", "/best-of", &body);
    };

    body.push_str(r#"<section id="hall-of-fame">"#);
    for (index, moment) in view.hall_of_fame.iter().enumerate() {
        let color = match index {
            0 => "gold",
            1 => "silver",
            _ => "#cd7f32",
        };
        body.push_str(&format!(
            r#"<div class="best-of-item" style="border-left-color: {color}"><p class="quote">"{}"</p><p class="author">— {}</p></div>"#,
            escape(&moment.quote),
            escape(&moment.author)
        ));
    }
    body.push_str("</section>");

    body.push_str(r#"<nav class="tabs">"#);
    for tab in std::iter::once("all").chain(CATEGORIES) {
        let active = if category.as_str() == tab { " active" } else { "" };
        let label = if tab == "all" { "Tutti" } else { category_label(tab) };
        body.push_str(&format!(
            r#"<a class="tab-btn{active}" href="/best-of?anno={year}&amp;categoria={tab}">{label}</a>"#
        ));
    }
    body.push_str("</nav>");

    body.push_str(r#"<section id="best-of-list">"#);
    if view.moments.is_empty() {
        body.push_str(r#"<div class="loading">Nessun momento in questa categoria.</div>"#);
    }
    for moment in &view.moments {
        body.push_str(&moment_item(moment));
    }
    body.push_str("</section>");

    render_page("Best Of", "/best-of", &body)
}

fn week_link(view: &PagelleView, step: WeekStep, label: &str) -> String {
    let target = view.view.stepped(step);
    if target.week_index() == view.view.week_index() {
        return format!(r#"<span class="week-nav disabled">{label}</span>"#);
    }
    let year = view.year.map(|y| y.to_string()).unwrap_or_else(|| "all".to_string());
    format!(
        r#"<a class="week-nav" href="/pagelle?anno={year}&amp;settimana={}">{label}</a>"#,
        target.week_index()
    )
}

/// `requested` keeps the selector on the asked-for year when it has no weeks.
pub fn render_pagelle(view: Option<&PagelleView>, requested: YearFilter, years: &[i32]) -> String {
    let selected = view
        .and_then(|v| v.year)
        .map_or(requested, YearFilter::Year);
    let mut body = year_select("/pagelle", selected, years);
    let Some(view) = view else {
        body.push_str(&placeholder(&[
            "Nessuna pagella disponibile.",
            "Esegui l'agente pagelle per generare i contenuti.",
        ]));
        return render_page("Pagelle", "/pagelle", &body);
    };

    let label = view
        .week
        .as_ref()
        .map(|w| format!("Settimana del {}", format_date(&w.start_date)))
        .unwrap_or_default();
    body.push_str(&format!(
        r#"<div class="week-selector">{}<span id="current-week">{}</span>{}</div>"#,
        week_link(view, WeekStep::Prev, "←"),
        escape(&label),
        week_link(view, WeekStep::Next, "→"),
    ));

    if let Some(week) = &view.week {
        body.push_str(r#"<section id="pagelle-grid" class="card-grid">"#);
        for card in &week.pagelle {
            let (voto, band) = match card.voto {
                Some(voto) => (voto.to_string(), GradeBand::for_voto(voto)),
                None => ("-".to_string(), GradeBand::Basso),
            };
            let band = match band {
                GradeBand::Alto => "voto-alto",
                GradeBand::Medio => "voto-medio",
                GradeBand::Basso => "voto-basso",
            };
            body.push_str(&format!(
                r#"<div class="pagella-card"><div class="pagella-header"><span class="pagella-name">{name}</span><span class="pagella-voto {band}">{voto}</span></div><p class="pagella-giudizio">"{giudizio}"</p><p class="pagella-stats">{messaggi} messaggi | {media} msg/giorno</p></div>"#,
                name = escape(&card.name),
                giudizio = escape(&card.giudizio),
                messaggi = card.messaggi,
                media = card.media_giornaliera,
            ));
        }
        body.push_str("</section>");

        if !week.summary.is_empty() {
            body.push_str(&format!(
                r#"<section id="week-summary"><p>{}</p></section>"#,
                escape(&week.summary)
            ));
        }
        for quote in &week.best_quotes {
            let text = match quote {
                BestQuote::Text(text) => escape(text),
                BestQuote::Attributed { quote, author: Some(author) } => {
                    format!("{} — {}", escape(quote), escape(author))
                }
                BestQuote::Attributed { quote, author: None } => escape(quote),
            };
            body.push_str(&format!(r#"<blockquote class="week-quote">{text}</blockquote>"#));
        }
    }

    if !view.cumulative.is_empty() {
        body.push_str(r#"<table id="cumulative"><tr><th>#</th><th>Nome</th><th>Media</th><th>Settimane</th><th>Messaggi</th><th>Migliore</th><th>Peggiore</th></tr>"#);
        for (index, row) in view.cumulative.iter().enumerate() {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                index + 1,
                escape(&row.name),
                row.media_voto,
                row.settimane_attive,
                format_number(row.total_messaggi),
                row.best_voto,
                row.worst_voto,
            ));
        }
        body.push_str("</table>");
    }

    render_page("Pagelle", "/pagelle", &body)
}

pub fn render_membri(members: Option<&[MemberCard]>) -> String {
    let Some(members) = members else {
        let body = placeholder(&[
            "Nessun profilo disponibile.",
            "Esegui l'agente membri per generare i profili.",
        ]);
        return render_page("Membri", "/membri", &body);
    };

    let mut body = String::from(r#"<section id="members-grid" class="card-grid">"#);
    for member in members {
        let profile = &member.profile;
        let avatar = match &profile.photo {
            Some(photo) => format!(
                r#"<img src="/img/membri/{}" alt="{}">"#,
                escape(photo),
                escape(&profile.name)
            ),
            None => format!(
                r#"<span class="member-avatar-fallback">{}</span>"#,
                escape(&member.avatar_fallback)
            ),
        };
        body.push_str(&format!(
            r#"<div class="member-card"><div class="member-header">{avatar}<div class="member-nickname">{}</div><div class="member-title">{}</div></div><p class="member-description">{}</p>"#,
            escape(&profile.name),
            escape(&member.display_title),
            escape(&profile.description),
        ));
        if let Some(catchphrase) = &profile.catchphrase {
            body.push_str(&format!(r#"<p class="member-catchphrase">"{}"</p>"#, escape(catchphrase)));
        }
        if !profile.traits.is_empty() {
            body.push_str(r#"<div class="member-traits">"#);
            for t in &profile.traits {
                body.push_str(&format!(r#"<span class="trait">{}</span>"#, escape(t)));
            }
            body.push_str("</div>");
        }
        if let Some(stats) = &profile.stats {
            body.push_str(&format!(
                r#"<p class="member-stats">{} messaggi | Rank: #{} | Media: {} parole/msg</p>"#,
                format_number(stats.message_count),
                stats.rank,
                stats.avg_words_per_message
            ));
        }
        if let Some(superpower) = &profile.superpower {
            body.push_str(&format!(
                r#"<p class="member-superpower"><strong>Superpotere:</strong> {}</p>"#,
                escape(superpower)
            ));
        }
        body.push_str("</div>");
    }
    body.push_str("</section>");

    render_page("Membri", "/membri", &body)
}

pub fn render_lider(view: Option<&LiderView>) -> String {
    let Some(view) = view else {
        return render_page("Lider", "/lider", &placeholder(&["Dati Lider non disponibili."]));
    };

    let mut body = format!(r#"<p id="lider-description">{}</p>"#, escape(&view.description));
    if !view.rules.is_empty() {
        body.push_str(r#"<ul id="rules-list">"#);
        for rule in &view.rules {
            body.push_str(&format!("<li>{}</li>", escape(rule)));
        }
        body.push_str("</ul>");
    }

    match &view.current {
        Some(current) => {
            body.push_str(&format!(
                r#"<div class="lider-card current-lider"><div class="lider-crown">👑</div><h3>{}</h3>"#,
                escape(&current.name)
            ));
            if let Some(alias) = &current.alias {
                body.push_str(&format!(r#"<p class="lider-alias">alias "{}"</p>"#, escape(alias)));
            }
            body.push_str(&format!(
                r#"<p class="lider-period">{}</p><p class="lider-highlight">{}</p>"#,
                escape(&current.period),
                escape(&current.highlight)
            ));
            if let Some(quote) = &current.quote {
                body.push_str(&format!(r#"<blockquote>"{}"</blockquote>"#, escape(quote)));
            }
            body.push_str("</div>");
        }
        None => body.push_str("<p>Nessun Lider attivo al momento.</p>"),
    }

    if view.timeline.is_empty() {
        body.push_str("<p>Nessun Lider nella storia.</p>");
    } else {
        body.push_str(r#"<div class="lider-timeline-list">"#);
        for entry in &view.timeline {
            let class = if entry.current { "lider-card current" } else { "lider-card" };
            let alias = entry
                .reign
                .alias
                .as_deref()
                .map(|a| format!(r#" <span class="alias">({})</span>"#, escape(a)))
                .unwrap_or_default();
            let quote = entry
                .reign
                .quote
                .as_deref()
                .map(|q| format!(r#"<blockquote>"{}"</blockquote>"#, escape(q)))
                .unwrap_or_default();
            body.push_str(&format!(
                r#"<div class="{class}"><div class="lider-number">{}</div><div class="lider-info"><h3>{}{alias}</h3><p class="period">{}</p><p class="highlight">{}</p>{quote}</div></div>"#,
                entry.number,
                escape(&entry.reign.name),
                escape(&entry.reign.period),
                escape(&entry.reign.highlight),
            ));
        }
        body.push_str("</div>");
    }

    let stats = &view.stats;
    body.push_str(r#"<section class="stats-grid">"#);
    body.push_str(&stat_card(&stats.total_liders.to_string(), "Lider Totali"));
    let (years, longest) = stats
        .longest_reign
        .as_ref()
        .map(|r| (r.years.to_string(), r.name.as_str()))
        .unwrap_or_else(|| ("?".to_string(), ""));
    body.push_str(&stat_card(&years, &format!("Anni del Regno Più Lungo {longest}")));
    let (count, most) = stats
        .most_reigns
        .as_ref()
        .map(|m| (m.count.to_string(), m.name.as_str()))
        .unwrap_or_else(|| ("?".to_string(), ""));
    body.push_str(&stat_card(&count, &format!("Record di Mandati {most}")));
    body.push_str("</section>");

    render_page("Lider", "/lider", &body)
}

pub fn render_storia(view: Option<&HistoryView>) -> String {
    let Some(view) = view else {
        let body = placeholder(&[
            "Storia non ancora disponibile.",
            "Esegui l'agente history per generare i contenuti.",
        ]);
        return render_page("Storia", "/storia", &body);
    };

    let or_dash = |value: Option<String>| value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".into());
    let mut body = String::from(r#"<section class="stats-grid">"#);
    body.push_str(&stat_card(&or_dash(view.years_active.map(|y| y.to_string())), "Anni di attività"));
    body.push_str(&stat_card(&or_dash(view.total_messages.map(format_number)), "Messaggi"));
    body.push_str(&stat_card(&or_dash(view.founding_date.clone()), "Fondazione"));
    body.push_str(&stat_card(&or_dash(view.founder.clone()), "Fondatore"));
    body.push_str("</section>");

    body.push_str(r#"<section class="timeline-container">"#);
    if view.timeline.is_empty() {
        body.push_str(r#"<p class="loading">Nessun evento nella timeline.</p>"#);
    }
    for event in &view.timeline {
        body.push_str(&format!(
            r#"<div class="timeline-event"><div class="event-date">{}</div><div class="event-content"><h3>{}</h3><p>{}</p></div></div>"#,
            escape(&event.date),
            escape(&event.title),
            escape(&event.description)
        ));
    }
    body.push_str("</section>");

    body.push_str(r#"<section class="years-grid">"#);
    if view.yearly_recap.is_empty() {
        body.push_str(r#"<p class="loading">Statistiche annuali non disponibili.</p>"#);
    }
    for card in &view.yearly_recap {
        let highlight = card
            .recap
            .highlight
            .as_deref()
            .map(|h| format!(r#"<p class="highlight">"{}"</p>"#, escape(h)))
            .unwrap_or_default();
        body.push_str(&format!(
            r#"<div class="year-card"><h3>{}</h3><p><strong>{}</strong> messaggi</p><p><strong>{}</strong> membri attivi</p><p>MVP: <strong>{}</strong></p>{highlight}</div>"#,
            card.year,
            format_number(card.recap.messages),
            card.recap.active_members,
            escape(card.recap.mvp.as_deref().unwrap_or("-")),
        ));
    }
    body.push_str("</section>");

    if let Some(narrative) = &view.evolution_narrative {
        body.push_str(&format!(r#"<section id="evolution-content"><p>{}</p></section>"#, escape(narrative)));
    }

    render_page("Storia", "/storia", &body)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="it">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · AperiPoker</title>
  <style>
    :root {
      --bg: #1d1b22;
      --bg-light: #2a2731;
      --ink: #f4efe6;
      --text-muted: #a39e96;
      --primary: #ff6b4a;
      --secondary: #f1c40f;
      --shadow: 0 18px 40px rgba(0, 0, 0, 0.35);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    nav.main {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      padding: 16px 24px;
      background: var(--bg-light);
    }

    nav.main a {
      color: var(--text-muted);
      text-decoration: none;
    }

    nav.main a.active {
      color: var(--secondary);
    }

    main {
      width: min(960px, 100%);
      margin: 0 auto;
      padding: 28px 18px 48px;
      display: grid;
      gap: 24px;
    }

    .stats-grid,
    .card-grid,
    .years-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat-card,
    .archivio-card,
    .member-card,
    .pagella-card,
    .lider-card,
    .year-card,
    .best-of-item {
      background: var(--bg-light);
      border-radius: 16px;
      padding: 16px;
      box-shadow: var(--shadow);
      color: inherit;
      text-decoration: none;
    }

    .best-of-item {
      border-left: 4px solid var(--primary);
    }

    .stat-value {
      font-size: 1.8rem;
      color: var(--secondary);
    }

    .leaderboard-item {
      display: grid;
      grid-template-columns: 48px 1fr 2fr 120px;
      align-items: center;
      gap: 12px;
      padding: 8px 0;
    }

    .bar {
      background: var(--bg-light);
      border-radius: 999px;
      height: 10px;
    }

    .bar-fill {
      background: var(--primary);
      border-radius: 999px;
      height: 100%;
    }

    .chart {
      display: flex;
      align-items: flex-end;
      gap: 4px;
      height: 160px;
    }

    .bar-vertical {
      flex: 1;
      height: 100%;
      display: flex;
      flex-direction: column;
      justify-content: flex-end;
      align-items: center;
    }

    .bar-vertical-fill {
      width: 100%;
      background: var(--primary);
      border-radius: 6px 6px 0 0;
    }

    .bar-vertical-fill.current {
      background: linear-gradient(0deg, var(--secondary), #f1c40f);
    }

    .bar-vertical-label {
      font-size: 0.7rem;
      color: var(--text-muted);
    }

    .voto-alto { color: #2ecc71; }
    .voto-medio { color: var(--secondary); }
    .voto-basso { color: #e74c3c; }

    .archivio-trend.positive { color: #2ecc71; }
    .archivio-trend.negative { color: #e74c3c; }

    .week-nav.disabled {
      opacity: 0.3;
    }

    .loading {
      text-align: center;
      color: var(--text-muted);
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      padding: 6px 8px;
      border-bottom: 1px solid var(--bg-light);
      text-align: left;
    }
  </style>
</head>
<body>
  <nav class="main">{{NAV}}</nav>
  <main>
    <h1>{{TITLE}}</h1>
    {{BODY}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_abbreviated() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.5K");
        assert_eq!(format_number(2_340_000), "2.3M");
    }

    #[test]
    fn dates_use_italian_short_months() {
        assert_eq!(format_date("2025-01-05"), "5 gen 2025");
        assert_eq!(format_date("2024-12-31T20:00:00"), "31 dic 2024");
        assert_eq!(format_date("boh"), "boh");
    }

    #[test]
    fn category_labels_fall_back_to_raw() {
        assert_eq!(category_label("fails"), "Epic Fail");
        assert_eq!(category_label("sfottò"), "sfottò");
    }

    #[test]
    fn escape_html_special_chars() {
        assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn missing_data_renders_placeholder() {
        let html = render_home(None);
        assert!(html.contains("Mai"));
        let html = render_pagelle(None, YearFilter::All, &[2025]);
        assert!(html.contains("Nessuna pagella disponibile."));
        assert!(html.contains(r#"<option value="2025">2025</option>"#));
    }

    #[test]
    fn pagelle_selector_keeps_requested_year_without_weeks() {
        let html = render_pagelle(None, YearFilter::Year(2024), &[2024, 2025]);
        assert!(html.contains(r#"<option value="2024" selected>2024</option>"#));
        assert!(html.contains(r#"<option value="all">Sempre</option>"#));
    }

    #[test]
    fn lider_timeline_shows_past_quotes() {
        let doc = serde_json::from_str(
            r#"{"timeline": [
                {"name": "Anna", "period": "2022", "endDate": "2023-01-01", "quote": "Comando io"},
                {"name": "Bruno", "period": "2023 - oggi", "endDate": null}
            ]}"#,
        )
        .unwrap();
        let html = render_lider(Some(&crate::stats::build_lider(doc)));
        assert!(html.contains(r#"<blockquote>"Comando io"</blockquote>"#));
    }

    #[test]
    fn page_marks_active_nav_entry() {
        let html = render_page("Lider", "/lider", "");
        assert!(html.contains(r#"<a href="/lider" class="active">Lider</a>"#));
        assert!(!html.contains("{{"));
    }
}
