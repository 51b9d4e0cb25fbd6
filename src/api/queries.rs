use clap::ValueEnum;

/// The user whose profile is fetched unless told otherwise.
pub const DEFAULT_USER_ID: &str = "767";

/// Built-in query documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum QueryPreset {
    /// Profile fields of a single user.
    #[default]
    UserInfo,
    /// Sum of every XP transaction.
    TotalXp,
    /// XP transactions in chronological order.
    XpProgress,
}

impl QueryPreset {
    /// The query document for this preset. Only `UserInfo` uses `user_id`.
    pub fn document(self, user_id: &str) -> String {
        match self {
            QueryPreset::UserInfo => user_info(user_id),
            QueryPreset::TotalXp => TOTAL_XP.to_string(),
            QueryPreset::XpProgress => XP_PROGRESS.to_string(),
        }
    }
}

fn user_info(user_id: &str) -> String {
    // Escape anything that would end the string literal early.
    let user_id = user_id.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"
query GetUserInfo {{
    user(where: {{id: {{_eq: "{user_id}"}}}}) {{
        id
        login
        email
        firstName
        lastName
        campus
        auditRatio
        totalUp
        totalDown
        audits
    }}
}}
"#
    )
}

const TOTAL_XP: &str = r#"
query GetTotalXp {
    transaction_aggregate(where: {type: {_eq: "xp"}}) {
        aggregate {
            sum {
                amount
            }
        }
    }
}
"#;

const XP_PROGRESS: &str = r#"
query GetXpProgress {
    transaction(where: {type: {_eq: "xp"}}, order_by: {createdAt: asc}) {
        amount
        createdAt
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_info_selects_the_given_id() {
        let document = QueryPreset::UserInfo.document(DEFAULT_USER_ID);
        assert!(document.contains("query GetUserInfo"));
        assert!(document.contains(r#"user(where: {id: {_eq: "767"}})"#));
        assert!(document.contains("auditRatio"));
    }

    #[test]
    fn user_info_escapes_quotes() {
        let document = QueryPreset::UserInfo.document(r#"7"} }"#);
        assert!(document.contains(r#"_eq: "7\"} }""#));
    }

    #[test]
    fn xp_presets_ignore_user_id() {
        assert_eq!(
            QueryPreset::TotalXp.document("1"),
            QueryPreset::TotalXp.document("2")
        );
        assert!(QueryPreset::XpProgress
            .document(DEFAULT_USER_ID)
            .contains("order_by: {createdAt: asc}"));
    }
}
