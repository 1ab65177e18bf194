//! Site-wide notice ticker.
//!
//! All current announcements are rendered into the bar; the first is shown
//! and the script rotates through the rest every [`AUTOPLAY_MS`]. [`Ticker`]
//! is the rotation state the script mirrors.

use crate::types::Announcement;
use chrono::{DateTime, Utc};
use maud::{Markup, html};

pub const AUTOPLAY_MS: u32 = 10_000;

pub fn current(announcements: &[Announcement], now: DateTime<Utc>) -> Vec<&Announcement> {
    announcements.iter().filter(|a| a.is_current(now)).collect()
}

/// The bar, or nothing when no announcement is current.
pub fn bar(announcements: &[Announcement], now: DateTime<Utc>) -> Markup {
    let items = current(announcements, now);
    if items.is_empty() {
        return html! {};
    }
    let controls = items.len() > 1;

    html! {
        div.announcement-bar role="region" aria-label="Announcements"
            data-count=(items.len()) data-interval=(AUTOPLAY_MS) {
            @if controls {
                button.ticker-prev type="button" aria-label="Previous announcement" { "‹" }
            }
            div.ticker-items {
                @for (i, item) in items.iter().enumerate() {
                    div.ticker-item.active[i == 0] data-index=(i) hidden[i != 0] {
                        @if let Some(icon) = item.icon {
                            span.ticker-icon aria-hidden="true" { (icon.glyph()) }
                        }
                        span.ticker-title { (item.title) }
                        @if let Some(link) = &item.link {
                            a.ticker-link href=(link) target="_blank" rel="noopener noreferrer" {
                                (item.link_text.as_deref().unwrap_or("Learn more"))
                            }
                        }
                    }
                }
            }
            @if controls {
                button.ticker-toggle type="button" aria-label="Pause autoplay" aria-pressed="false" { "❚❚" }
                button.ticker-next type="button" aria-label="Next announcement" { "›" }
                div.ticker-dots {
                    @for i in 0..items.len() {
                        button.ticker-dot.active[i == 0] type="button" data-index=(i)
                            aria-label={ "Go to announcement " (i + 1) } {}
                    }
                }
            }
        }
    }
}

/// Rotation over `len` announcements with an autoplay flag.
///
/// The autoplay timer only runs while [`Ticker::autoplay_active`] holds; a
/// change of `playing` or `len` restarts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    len: usize,
    index: usize,
    playing: bool,
}

impl Ticker {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            playing: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn autoplay_active(&self) -> bool {
        self.playing && self.len > 1
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Adopt a new list length, going back to the start if the current
    /// index fell off the end.
    pub fn reconcile(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::AnnouncementIcon;
    use chrono::Duration;

    fn active(title: &str) -> Announcement {
        Announcement {
            title: title.into(),
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn no_current_announcements_renders_nothing() {
        let hidden = Announcement {
            is_active: false,
            ..active("hidden")
        };
        assert_eq!(bar(&[hidden], fixed_now()).into_string(), "");
        assert_eq!(bar(&[], fixed_now()).into_string(), "");
    }

    #[test]
    fn single_announcement_has_no_controls() {
        let mut a = active("Water main flushing");
        a.icon = Some(AnnouncementIcon::Construction);
        a.link = Some("https://argyle.mn/water".into());
        let html = bar(&[a], fixed_now()).into_string();
        assert!(html.contains("Water main flushing"));
        assert!(html.contains("🚧"));
        assert!(html.contains(">Learn more</a>"));
        assert!(!html.contains("ticker-next"));
    }

    #[test]
    fn multiple_announcements_get_controls_and_dots() {
        let expired = Announcement {
            end_date: Some(fixed_now() - Duration::days(1)),
            ..active("expired")
        };
        let html = bar(&[active("one"), expired, active("two")], fixed_now()).into_string();
        assert!(html.contains(r#"data-count="2""#));
        assert!(!html.contains("expired"));
        assert!(html.contains("ticker-prev"));
        assert_eq!(html.matches("Go to announcement").count(), 2);
        assert!(html.contains(r#"data-interval="10000""#));
    }

    #[test]
    fn ticker_wraps_both_ways() {
        let mut t = Ticker::new(3);
        t.prev();
        assert_eq!(t.index(), 2);
        t.next();
        assert_eq!(t.index(), 0);
        t.select(1);
        assert_eq!(t.index(), 1);
        t.select(9);
        assert_eq!(t.index(), 1);
    }

    #[test]
    fn autoplay_needs_several_items_and_play_state() {
        let mut t = Ticker::new(2);
        assert!(t.autoplay_active());
        t.toggle();
        assert!(!t.autoplay_active());
        t.toggle();
        t.reconcile(1);
        assert!(!t.autoplay_active());
    }

    #[test]
    fn reconcile_resets_out_of_range_index() {
        let mut t = Ticker::new(4);
        t.select(3);
        t.reconcile(2);
        assert_eq!(t.index(), 0);
        t.select(1);
        t.reconcile(5);
        assert_eq!(t.index(), 1);
        t.reconcile(0);
        t.next();
        assert_eq!(t.index(), 0);
    }
}
