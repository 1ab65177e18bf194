//! Roster for a council, office or other civic group.
//!
//! Sections render in a fixed order: notices, meetings, hours, members,
//! contact, additional content. A section with nothing to show is left out
//! entirely, header included.

use super::RenderContext;
use crate::format::{self, format_phone};
use crate::types::{ImageRef, lenient};
use chrono::{DateTime, Utc};
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalGroupProps {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub group_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub members: Vec<Member>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub meeting_info: Option<MeetingInfo>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub office_hours: Option<OfficeHours>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub contact_info: Option<ContactInfo>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub additional_content: Vec<AdditionalContent>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub special_notices: Vec<Notice>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub display_settings: DisplaySettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub photo: Option<ImageRef>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub extension: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub term_start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub term_end: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    pub display_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInfo {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub has_meetings: bool,
    #[serde(default, deserialize_with = "lenient::text")]
    pub schedule: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub additional_info: Option<String>,
}

impl MeetingInfo {
    fn is_shown(&self) -> bool {
        self.has_meetings
            && (self.schedule.is_some()
                || self.time.is_some()
                || self.location.is_some()
                || self.additional_info.is_some())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeHours {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub has_hours: bool,
    #[serde(default, deserialize_with = "lenient::text")]
    pub hours_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mailing_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub main_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fax: Option<String>,
}

impl ContactInfo {
    fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.mailing_address.is_none()
            && self.main_phone.is_none()
            && self.email.is_none()
            && self.fax.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalContent {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub display_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub end_date: Option<DateTime<Utc>>,
}

impl Notice {
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_active && format::within_window(now, self.start_date, self.end_date)
    }
}

/// Absent settings show photos and contact details in two columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    #[serde(default = "yes", deserialize_with = "lenient_bool")]
    pub show_photos: bool,
    #[serde(default = "yes", deserialize_with = "lenient_bool")]
    pub show_contact_info: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    pub columns_per_row: Option<i64>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_photos: true,
            show_contact_info: true,
            columns_per_row: None,
        }
    }
}

impl DisplaySettings {
    pub fn columns(&self) -> u8 {
        match self.columns_per_row {
            Some(3) => 3,
            Some(4) => 4,
            _ => 2,
        }
    }
}

fn yes() -> bool {
    true
}

/// Only an explicit `false` turns a setting off.
fn lenient_bool<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(!matches!(
        serde_json::Value::deserialize(deserializer)?,
        serde_json::Value::Bool(false)
    ))
}

/// Active members in display order. The sort is stable, so members sharing
/// an order (or lacking one, which counts as 0) keep their authored order.
pub fn visible_members(members: &[Member]) -> Vec<&Member> {
    let mut active: Vec<&Member> = members.iter().filter(|m| m.is_active).collect();
    active.sort_by_key(|m| m.display_order.unwrap_or(0));
    active
}

pub fn current_notices(notices: &[Notice], now: DateTime<Utc>) -> Vec<&Notice> {
    notices.iter().filter(|n| n.is_current(now)).collect()
}

pub fn render(props: &MunicipalGroupProps, ctx: &RenderContext) -> Markup {
    let members = visible_members(&props.members);
    let notices = current_notices(&props.special_notices, ctx.now);
    let meeting = props.meeting_info.as_ref().filter(|m| m.is_shown());
    let hours = props
        .office_hours
        .as_ref()
        .filter(|h| h.has_hours)
        .and_then(|h| h.hours_text.as_deref());
    let contact = props.contact_info.as_ref().filter(|c| !c.is_empty());
    let mut additional: Vec<&AdditionalContent> = props.additional_content.iter().collect();
    additional.sort_by_key(|a| a.display_order.unwrap_or(0));

    html! {
        section.municipal-group {
            header.group-header {
                @if let Some(title) = &props.title {
                    h2.group-title { (title) }
                }
                @if let Some(description) = &props.description {
                    p.group-description { (description) }
                }
            }

            @if !notices.is_empty() {
                div.group-notices role="status" {
                    @for notice in &notices {
                        div.group-notice {
                            @if let Some(title) = &notice.title {
                                h3 { (title) }
                            }
                            @if let Some(message) = &notice.message {
                                p { (message) }
                            }
                        }
                    }
                }
            }

            @if let Some(meeting) = meeting {
                div.group-panel.group-meetings {
                    h3 { "Meeting Information" }
                    @if let Some(schedule) = &meeting.schedule {
                        p { strong { "Schedule:" } " " (schedule) }
                    }
                    @if let Some(time) = &meeting.time {
                        p { strong { "Time:" } " " (time) }
                    }
                    @if let Some(location) = &meeting.location {
                        p { strong { "Location:" } " " (location) }
                    }
                    @if let Some(info) = &meeting.additional_info {
                        p.group-meeting-extra { (info) }
                    }
                }
            }

            @if let Some(hours) = hours {
                div.group-panel.group-hours {
                    h3 { "Hours" }
                    p.preserve-lines { (hours) }
                }
            }

            @if !members.is_empty() {
                div.group-members {
                    h3 { (members_heading(props.group_type.as_deref())) }
                    div class={ "member-grid cols-" (props.display_settings.columns()) } {
                        @for member in &members {
                            (member_card(member, &props.display_settings, ctx))
                        }
                    }
                }
            }

            @if let Some(contact) = contact {
                (contact_panel(contact))
            }

            @if !additional.is_empty() {
                div.group-additional {
                    @for block in &additional {
                        div.group-panel {
                            @if let Some(title) = &block.title {
                                h3 { (title) }
                            }
                            @if let Some(content) = &block.content {
                                p.preserve-lines { (content) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn members_heading(group_type: Option<&str>) -> &'static str {
    match group_type {
        Some("council") => "Council Members",
        Some("office") => "Staff",
        _ => "Members",
    }
}

fn member_card(member: &Member, settings: &DisplaySettings, ctx: &RenderContext) -> Markup {
    let photo = member
        .photo
        .as_ref()
        .filter(|_| settings.show_photos)
        .and_then(|p| ctx.images.sized(p, 192, 192).map(|src| (src, p.alt.clone())));

    html! {
        article.member-card {
            @if let Some((src, alt)) = photo {
                img.member-photo src=(src)
                    alt=(alt.unwrap_or_else(|| format!("Photo of {}", member.name)));
            }
            h4.member-name { (member.name) }
            @if let Some(role) = &member.role {
                p.member-role { (role) }
            }
            @if let Some(bio) = &member.bio {
                p.member-bio { (bio) }
            }
            @if settings.show_contact_info && (member.phone.is_some() || member.email.is_some()) {
                div.member-contact {
                    @if let Some(phone) = &member.phone {
                        p.member-phone { (format_phone(phone, member.extension.as_deref())) }
                    }
                    @if let Some(email) = &member.email {
                        p.member-email { a href={ "mailto:" (email) } { (email) } }
                    }
                }
            }
            @if let Some(term) = format::term_line(member.term_start, member.term_end) {
                p.member-term { (term) }
            }
        }
    }
}

fn contact_panel(contact: &ContactInfo) -> Markup {
    html! {
        div.group-panel.group-contact {
            h3 { "Contact Information" }
            div.group-contact-grid {
                div {
                    @if let Some(address) = &contact.address {
                        h4 { "Address" }
                        p.preserve-lines { (address) }
                    }
                    @if let Some(mailing) = &contact.mailing_address {
                        h4 { "Mailing Address" }
                        p.preserve-lines { (mailing) }
                    }
                }
                div {
                    @if let Some(phone) = &contact.main_phone {
                        p.group-phone { (format_phone(phone, None)) }
                    }
                    @if let Some(email) = &contact.email {
                        p { a href={ "mailto:" (email) } { (email) } }
                    }
                    @if let Some(fax) = &contact.fax {
                        p { "Fax: " (fax) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use chrono::Duration;
    use serde_json::{Value, json};

    fn group(value: Value) -> MunicipalGroupProps {
        serde_json::from_value(value).unwrap()
    }

    fn member(name: &str, order: Option<i64>) -> Value {
        match order {
            Some(o) => json!({"name": name, "isActive": true, "displayOrder": o}),
            None => json!({"name": name, "isActive": true}),
        }
    }

    #[test]
    fn members_stable_sorted_by_display_order() {
        let props = group(json!({"members": [
            member("A", Some(2)),
            member("B", Some(0)),
            member("C", Some(0)),
            member("D", Some(1)),
        ]}));
        let names: Vec<&str> = visible_members(&props.members)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, ["B", "C", "D", "A"]);
    }

    #[test]
    fn missing_order_counts_as_zero_and_inactive_are_hidden() {
        let props = group(json!({"members": [
            member("Late", Some(1)),
            member("Unordered", None),
            {"name": "Retired", "isActive": false, "displayOrder": -5},
            member("First", Some(0)),
        ]}));
        let names: Vec<&str> = visible_members(&props.members)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, ["Unordered", "First", "Late"]);
    }

    #[test]
    fn notices_filtered_by_flag_and_window() {
        let now = fixed_now();
        let day = Duration::days(1);
        let props = group(json!({"specialNotices": [
            {"title": "always", "isActive": true},
            {"title": "window", "isActive": true,
             "startDate": (now - day).to_rfc3339(), "endDate": (now + day).to_rfc3339()},
            {"title": "expired", "isActive": true, "endDate": (now - day).to_rfc3339()},
            {"title": "future", "isActive": true, "startDate": (now + day).to_rfc3339()},
            {"title": "off", "isActive": false},
        ]}));
        let titles: Vec<&str> = current_notices(&props.special_notices, now)
            .iter()
            .filter_map(|n| n.title.as_deref())
            .collect();
        assert_eq!(titles, ["always", "window"]);
    }

    #[test]
    fn empty_sections_are_omitted() {
        let images = images();
        let html = render(
            &group(json!({
                "title": "Planning Commission",
                "meetingInfo": {"hasMeetings": false, "schedule": "Monthly"},
                "officeHours": {"hasHours": true},
                "contactInfo": {},
                "members": [{"name": "Gone", "isActive": false}],
            })),
            &ctx(&images),
        )
        .into_string();
        assert!(html.contains("Planning Commission"));
        for absent in [
            "Meeting Information",
            "Hours",
            "Members",
            "Contact Information",
            "group-notices",
            "group-additional",
        ] {
            assert!(!html.contains(absent), "{absent} should be omitted");
        }
    }

    #[test]
    fn sections_render_in_fixed_order() {
        let images = images();
        let html = render(
            &group(json!({
                "groupType": "council",
                "additionalContent": [
                    {"title": "Second extra", "content": "b", "displayOrder": 2},
                    {"title": "First extra", "content": "a", "displayOrder": 1},
                ],
                "contactInfo": {"mainPhone": "2184376621"},
                "members": [member("Mayor Smith", None)],
                "officeHours": {"hasHours": true, "hoursText": "Mon-Fri 8-4"},
                "meetingInfo": {"hasMeetings": true, "schedule": "First Monday"},
                "specialNotices": [{"title": "Office closed", "isActive": true}],
            })),
            &ctx(&images),
        )
        .into_string();
        let order = [
            "Office closed",
            "Meeting Information",
            "Mon-Fri 8-4",
            "Council Members",
            "Contact Information",
            "First extra",
            "Second extra",
        ];
        let positions: Vec<usize> = order.iter().map(|s| html.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(html.contains("(218) 437-6621"));
    }

    #[test]
    fn member_card_details() {
        let images = images();
        let html = render(
            &group(json!({
                "groupType": "office",
                "displaySettings": {"columnsPerRow": 3},
                "members": [{
                    "name": "Jo Clerk",
                    "role": "City Clerk",
                    "isActive": true,
                    "phone": "2184376621",
                    "extension": "12",
                    "email": "clerk@argyle.mn",
                    "termStart": "2019-01-01",
                    "photo": {"asset": {"_ref": "image-jo-400x400-jpg"}},
                }],
            })),
            &ctx(&images),
        )
        .into_string();
        assert!(html.contains("<h3>Staff</h3>"));
        assert!(html.contains("member-grid cols-3"));
        assert!(html.contains("(218) 437-6621 ext. 12"));
        assert!(html.contains(r#"href="mailto:clerk@argyle.mn""#));
        assert!(html.contains("Term: 2019 - Present"));
        assert!(html.contains(r#"alt="Photo of Jo Clerk""#));
    }

    #[test]
    fn display_settings_can_hide_photos_and_contacts() {
        let images = images();
        let html = render(
            &group(json!({
                "displaySettings": {"showPhotos": false, "showContactInfo": false, "columnsPerRow": 7},
                "members": [{
                    "name": "Private",
                    "isActive": true,
                    "phone": "2184376621",
                    "photo": {"asset": {"_ref": "image-p-1x1-jpg"}},
                }],
            })),
            &ctx(&images),
        )
        .into_string();
        assert!(html.contains("<h3>Members</h3>"));
        assert!(html.contains("member-grid cols-2"));
        assert!(!html.contains("member-photo"));
        assert!(!html.contains("437-6621"));
    }
}
