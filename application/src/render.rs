//! Plain text rendering of the views.

use std::fmt::Write as _;

use common::pagination::Control;
use itertools::Itertools as _;
use service::{domain::Partner, read::Connection};

use crate::{
    view::{Banner, Connections, Details, Listing, Status, TopPartners},
    Error, Route,
};

/// Renders a single [`Partner`] card.
#[must_use]
pub fn partner(p: &Partner) -> String {
    format!(
        "{id}  {name} · {subject} · {mode} · {level} · ★ {rating}\n    {avatar}",
        id = p.id,
        name = p.name,
        subject = p.subject,
        mode = p.study_mode,
        level = p.experience,
        rating = p.rating,
        avatar = p.avatar.url(),
    )
}

/// Renders every detail of a single [`Partner`].
fn profile(p: &Partner) -> String {
    let mut out = partner(p);
    _ = write!(
        out,
        "\n    available: {}\n    location: {}\n    connections: {}",
        p.availability, p.location, p.connections,
    );
    if let Some(email) = &p.email {
        _ = write!(out, "\n    email: {email}");
    }
    if let Some(bio) = &p.bio {
        _ = write!(out, "\n    {bio}");
    }
    out
}

/// Renders the provided [`Error`] as user-facing copy.
#[must_use]
pub fn error(e: &Error) -> String {
    format!("[{}] {}", e.code, e.message)
}

/// Renders the [`Status`] of a view without a value to show, if any.
fn placeholder(status: &Status, empty: &str) -> Option<String> {
    match status {
        Status::Idle | Status::Loading => Some("Loading...".to_owned()),
        Status::Empty | Status::NotFound => Some(empty.to_owned()),
        Status::Failed(e) => Some(error(e)),
        Status::Ready => None,
    }
}

/// Renders the current page of a [`Listing`] along with its page controls.
#[must_use]
pub fn listing(l: &Listing) -> String {
    let mut out = String::new();
    if let Some(notice) = l.notice() {
        _ = writeln!(out, "{}", error(notice));
    }
    if let Some(text) = placeholder(l.status(), "No partners found.") {
        out.push_str(&text);
        return out;
    }

    _ = writeln!(out, "{}", l.page_items().iter().map(partner).join("\n"));
    let page = l.pagination().page();
    let controls = l.page_window().into_iter().map(|c| match c {
        Control::Number(n) if n == page => format!("[{n}]"),
        Control::Number(n) => n.to_string(),
        Control::Gap => "…".to_owned(),
    });
    _ = write!(
        out,
        "Showing {}\n{} {} {}",
        l.range(),
        if l.pagination().has_previous() { "<" } else { " " },
        controls.format(" "),
        if l.pagination().has_next() { ">" } else { " " },
    );
    out
}

/// Renders the slides of a [`Banner`].
#[must_use]
pub fn banner(b: &Banner) -> String {
    placeholder(b.status(), "No recent partners.").unwrap_or_else(|| {
        b.slides()
            .into_iter()
            .map(|s| format!("({}) {}", s.key, partner(s.partner)))
            .join("\n")
    })
}

/// Renders [`TopPartners`].
#[must_use]
pub fn top(t: &TopPartners) -> String {
    placeholder(t.status(), "No top partners yet.")
        .unwrap_or_else(|| t.partners().iter().map(partner).join("\n"))
}

/// Renders a partner [`Details`] page.
#[must_use]
pub fn details(d: &Details) -> String {
    match (d.partner(), d.error()) {
        (Some(p), _) => profile(p),
        (None, Some(e)) => e.message,
        (None, None) => "Loading...".to_owned(),
    }
}

/// Renders a [`Connection`] row.
fn connection(c: &Connection) -> String {
    let route = Route::Partner(c.partner_id.clone());
    format!("{} -> {route}", partner(&c.partner))
}

/// Renders the [`Connections`] dashboard.
#[must_use]
pub fn connections(c: &Connections) -> String {
    placeholder(c.status(), "No connections yet.")
        .unwrap_or_else(|| c.rows().iter().map(connection).join("\n"))
}

#[cfg(test)]
mod spec {
    use service::domain::partner::{Avatar, ExperienceLevel as L};

    use crate::fixture::partner;

    #[test]
    fn falls_back_to_default_avatar() {
        let mut p = partner("p1", "Physics", L::Expert, 4.0);
        p.avatar = Avatar::new("");

        let card = super::partner(&p);

        assert!(card.contains(Avatar::PLACEHOLDER));
        assert!(card.starts_with("p1  Partner p1 · Physics"));
    }
}
