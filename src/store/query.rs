//! store::query
//!
//! Record selection shared by the in-memory and file backends.
//!
//! Both backends hold a plain `Vec<AliasRecord>`; these functions give them
//! identical lookup and uniqueness semantics.

use super::traits::{ConflictQuery, StoreError};
use crate::core::types::{
    AliasDraft, AliasId, AliasPath, AliasRecord, LangCode, Scope, SourcePath,
};

fn in_scope(record: &AliasRecord, scope: &Scope) -> bool {
    record.domain == scope.domain && record.language == scope.language
}

pub(crate) fn find_by_scope(
    records: &[AliasRecord],
    alias: &AliasPath,
    scope: &Scope,
) -> Option<AliasRecord> {
    records
        .iter()
        .filter(|r| &r.alias == alias && in_scope(r, scope))
        .max_by_key(|r| r.id)
        .cloned()
}

pub(crate) fn find_global(
    records: &[AliasRecord],
    alias: &AliasPath,
    language: &LangCode,
) -> Option<AliasRecord> {
    let matching = |lang: &LangCode| {
        records
            .iter()
            .filter(|r| &r.alias == alias && &r.language == lang)
            .max_by_key(|r| r.id)
            .cloned()
    };

    matching(language).or_else(|| {
        if language.is_not_specified() {
            None
        } else {
            matching(&LangCode::not_specified())
        }
    })
}

pub(crate) fn load_by_source(
    records: &[AliasRecord],
    source: &SourcePath,
    scope: &Scope,
) -> Option<AliasRecord> {
    records
        .iter()
        .filter(|r| &r.source == source && in_scope(r, scope))
        .max_by_key(|r| r.id)
        .cloned()
}

pub(crate) fn find_conflict(records: &[AliasRecord], query: &ConflictQuery) -> Option<AliasRecord> {
    records
        .iter()
        .filter(|r| r.alias.eq_ignore_case(&query.alias))
        .filter(|r| r.language == query.language)
        .filter(|r| query.domain.is_none() || r.domain == query.domain)
        .filter(|r| query.exclude_id != Some(r.id))
        .filter(|r| query.exclude_source.as_ref() != Some(&r.source))
        .min_by_key(|r| r.id)
        .cloned()
}

/// Insert or update `draft`, enforcing the (alias, language, domain) index.
pub(crate) fn apply_save(
    records: &mut Vec<AliasRecord>,
    next_id: &mut u64,
    draft: AliasDraft,
) -> Result<AliasRecord, StoreError> {
    let scope = draft.scope();
    let taken = records
        .iter()
        .any(|r| r.alias == draft.alias && in_scope(r, &scope) && Some(r.id) != draft.id);
    if taken {
        return Err(StoreError::UniqueViolation {
            alias: draft.alias,
            scope: scope.to_string(),
        });
    }

    match draft.id {
        Some(id) => {
            let slot = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(StoreError::NotFound(id))?;
            *slot = draft.into_record(id);
            Ok(slot.clone())
        }
        None => {
            let id = AliasId(*next_id);
            *next_id += 1;
            let record = draft.into_record(id);
            records.push(record.clone());
            Ok(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DomainId;

    fn lang(code: &str) -> LangCode {
        LangCode::new(code).unwrap()
    }

    fn record(id: u64, source: &str, alias: &str, language: &str, domain: Option<&str>) -> AliasRecord {
        AliasRecord {
            id: AliasId(id),
            source: SourcePath::new(source).unwrap(),
            alias: AliasPath::new(alias).unwrap(),
            language: lang(language),
            domain: domain.map(|d| DomainId::new(d).unwrap()),
        }
    }

    fn alias(a: &str) -> AliasPath {
        AliasPath::new(a).unwrap()
    }

    #[test]
    fn find_by_scope_respects_domain_and_language() {
        let records = vec![
            record(1, "/node/1", "/contact", "en", Some("a")),
            record(2, "/node/3", "/contact", "en", Some("b")),
            record(3, "/node/4", "/contact", "fr", Some("a")),
        ];
        let scope_b = Scope::new(Some(DomainId::new("b").unwrap()), lang("en"));
        let found = find_by_scope(&records, &alias("/contact"), &scope_b).unwrap();
        assert_eq!(found.id, AliasId(2));

        let global = Scope::new(None, lang("en"));
        assert!(find_by_scope(&records, &alias("/contact"), &global).is_none());
    }

    #[test]
    fn find_global_prefers_exact_language_then_und() {
        let records = vec![
            record(1, "/node/1", "/about", "und", None),
            record(2, "/node/2", "/about", "en", Some("a")),
        ];
        assert_eq!(
            find_global(&records, &alias("/about"), &lang("en")).unwrap().id,
            AliasId(2)
        );
        assert_eq!(
            find_global(&records, &alias("/about"), &lang("de")).unwrap().id,
            AliasId(1)
        );
        assert!(find_global(&records, &alias("/missing"), &lang("en")).is_none());
    }

    #[test]
    fn find_global_newest_wins() {
        let records = vec![
            record(1, "/node/1", "/about", "en", None),
            record(5, "/node/5", "/about", "en", Some("x")),
        ];
        assert_eq!(
            find_global(&records, &alias("/about"), &lang("en")).unwrap().id,
            AliasId(5)
        );
    }

    #[test]
    fn conflict_is_case_insensitive_and_excludes_self() {
        let records = vec![record(1, "/node/1", "/Contact", "en", Some("a"))];
        let mut query = ConflictQuery {
            alias: alias("/contact"),
            language: lang("en"),
            domain: None,
            exclude_id: None,
            exclude_source: None,
        };
        assert!(find_conflict(&records, &query).is_some());

        query.exclude_id = Some(AliasId(1));
        assert!(find_conflict(&records, &query).is_none());

        query.exclude_id = None;
        query.exclude_source = Some(SourcePath::new("/node/1").unwrap());
        assert!(find_conflict(&records, &query).is_none());

        query.exclude_source = None;
        query.domain = Some(DomainId::new("b").unwrap());
        assert!(find_conflict(&records, &query).is_none());
    }

    #[test]
    fn apply_save_enforces_index() {
        let mut records = Vec::new();
        let mut next_id = 1;
        let draft = AliasDraft::new(
            SourcePath::new("/node/1").unwrap(),
            alias("/contact"),
            lang("en"),
            Some(DomainId::new("a").unwrap()),
        );
        let saved = apply_save(&mut records, &mut next_id, draft.clone()).unwrap();
        assert_eq!(saved.id, AliasId(1));

        let mut dup = draft.clone();
        dup.source = SourcePath::new("/node/2").unwrap();
        let err = apply_save(&mut records, &mut next_id, dup).unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        // Same alias in another domain is fine
        let mut other = draft;
        other.domain = Some(DomainId::new("b").unwrap());
        assert_eq!(
            apply_save(&mut records, &mut next_id, other).unwrap().id,
            AliasId(2)
        );
    }

    #[test]
    fn apply_save_updates_in_place() {
        let mut records = vec![record(1, "/node/1", "/old", "en", None)];
        let mut next_id = 2;
        let draft = AliasDraft::new(
            SourcePath::new("/node/1").unwrap(),
            alias("/new"),
            lang("en"),
            None,
        )
        .with_id(AliasId(1));
        let saved = apply_save(&mut records, &mut next_id, draft).unwrap();
        assert_eq!(saved.alias.as_str(), "/new");
        assert_eq!(records.len(), 1);
        assert_eq!(next_id, 2);
    }

    #[test]
    fn apply_save_missing_update_target() {
        let mut records = Vec::new();
        let mut next_id = 1;
        let draft = AliasDraft::new(
            SourcePath::new("/node/1").unwrap(),
            alias("/x"),
            lang("en"),
            None,
        )
        .with_id(AliasId(9));
        assert_eq!(
            apply_save(&mut records, &mut next_id, draft),
            Err(StoreError::NotFound(AliasId(9)))
        );
    }
}
