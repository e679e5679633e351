use std::collections::HashSet;

use crate::models::portfolio::Repository;

/// Collects primary languages and topics across `repos`, de-duplicated in
/// first-seen order. Case-sensitive: "Go" and "go" are distinct skills.
pub fn extract_skills(repos: &[Repository]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut skills = Vec::new();

    for repo in repos {
        let language = (!repo.language.is_empty()).then_some(repo.language.as_str());
        for skill in language.into_iter().chain(repo.topics.iter().map(String::as_str)) {
            if seen.insert(skill) {
                skills.push(skill.to_string());
            }
        }
    }

    skills
}
