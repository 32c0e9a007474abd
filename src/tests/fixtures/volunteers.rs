use crate::modules::volunteers::core::volunteer::Volunteer;
use crate::shared::core::ids::VolunteerId;

pub fn make_volunteer(id: i64, name: &str, email: &str) -> Volunteer {
    Volunteer {
        id: VolunteerId(id),
        name: name.to_string(),
        email: Some(email.to_string()),
        phone: None,
        dept: None,
        college_id: None,
    }
}
