use crate::shared::core::ids::VolunteerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: VolunteerId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub dept: Option<String>,
    #[serde(default)]
    pub college_id: Option<String>,
}

impl Volunteer {
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(email))
    }
}

/// Blank optional fields are sent as `null`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewVolunteer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dept: Option<String>,
    pub college_id: Option<String>,
}

impl NewVolunteer {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = non_blank(self.email);
        self.phone = non_blank(self.phone);
        self.dept = non_blank(self.dept);
        self.college_id = non_blank(self.college_id);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VolunteerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college_id: Option<String>,
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod volunteer_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_match_email_case_insensitively() {
        let volunteer = Volunteer {
            id: VolunteerId(1),
            name: "John Doe".into(),
            email: Some("John.Doe@Fest.org".into()),
            phone: None,
            dept: None,
            college_id: None,
        };
        assert!(volunteer.has_email("john.doe@fest.org"));
        assert!(!volunteer.has_email("jane@fest.org"));
    }

    #[rstest]
    fn it_should_send_blank_fields_as_null() {
        let payload = NewVolunteer {
            name: "  Jane ".into(),
            email: Some("jane@fest.org".into()),
            phone: Some("   ".into()),
            dept: Some(String::new()),
            college_id: None,
        }
        .normalized();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["name"], "Jane");
        assert!(json["phone"].is_null());
        assert!(json["dept"].is_null());
        assert!(json["college_id"].is_null());
    }
}
