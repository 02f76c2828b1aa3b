//! In-memory tables behind one `RwLock`.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use lossdesk_domain::loss::{self, LossDraft, LossPatch, LossRecord};
use lossdesk_domain::{DomainError, DomainResult, LookupKind, LookupRow, ReportingLimitArea, normalize_name};

#[derive(Debug, Default)]
struct NameTable {
    next_id: i64,
    rows: BTreeMap<i64, String>,
}

impl NameTable {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn name_taken(&self, name: &str, exclude: Option<i64>) -> bool {
        self.rows
            .iter()
            .any(|(id, existing)| existing == name && Some(*id) != exclude)
    }
}

#[derive(Debug, Clone)]
struct LimitRow {
    name: String,
    department: i64,
}

#[derive(Debug, Default)]
struct Tables {
    departments: NameTable,
    affected_areas: NameTable,
    causes: NameTable,
    next_limit_area_id: i64,
    limit_areas: BTreeMap<i64, LimitRow>,
    next_loss_id: i64,
    losses: BTreeMap<i64, LossRecord>,
}

impl Tables {
    fn name_table(&self, kind: LookupKind) -> DomainResult<&NameTable> {
        match kind {
            LookupKind::Department => Ok(&self.departments),
            LookupKind::AffectedArea => Ok(&self.affected_areas),
            LookupKind::Cause => Ok(&self.causes),
            LookupKind::ReportingLimitArea => Err(DomainError::Internal(
                "reporting limit areas live in their own table".to_string(),
            )),
        }
    }

    fn name_table_mut(&mut self, kind: LookupKind) -> DomainResult<&mut NameTable> {
        match kind {
            LookupKind::Department => Ok(&mut self.departments),
            LookupKind::AffectedArea => Ok(&mut self.affected_areas),
            LookupKind::Cause => Ok(&mut self.causes),
            LookupKind::ReportingLimitArea => Err(DomainError::Internal(
                "reporting limit areas live in their own table".to_string(),
            )),
        }
    }

    fn limit_area(&self, id: i64) -> Option<ReportingLimitArea> {
        self.limit_areas.get(&id).map(|row| ReportingLimitArea {
            id,
            name: row.name.clone(),
            department: row.department,
        })
    }

    fn department_name(&self, id: i64) -> String {
        self.departments.rows.get(&id).cloned().unwrap_or_default()
    }

    /// Count of rows referencing a lookup row, per referencing table.
    fn reference_count(&self, kind: LookupKind, id: i64) -> usize {
        let from_limit_areas = match kind {
            LookupKind::Department => self
                .limit_areas
                .values()
                .filter(|row| row.department == id)
                .count(),
            _ => 0,
        };
        let from_losses = self
            .losses
            .values()
            .filter(|record| match kind {
                LookupKind::Department => record.department == id,
                LookupKind::AffectedArea => record.affected_area == id,
                LookupKind::Cause => record.cause == id,
                LookupKind::ReportingLimitArea => record.reporting_limit_area == id,
            })
            .count();
        from_limit_areas + from_losses
    }

    fn validate_loss(&self, draft: &LossDraft) -> DomainResult<()> {
        loss::validate_scalars(draft)?;

        for (field, id, table) in [
            ("department", draft.department, &self.departments),
            ("affected_area", draft.affected_area, &self.affected_areas),
            ("cause", draft.cause, &self.causes),
        ] {
            if !table.rows.contains_key(&id) {
                return Err(invalid_reference(field, id));
            }
        }

        let area = self
            .limit_area(draft.reporting_limit_area)
            .ok_or_else(|| invalid_reference("reporting_limit_area", draft.reporting_limit_area))?;

        if !loss::limit_area_matches_department(&area, draft.department) {
            let area_display = area.display(&self.department_name(area.department));
            return Err(loss::limit_area_mismatch(
                &area_display,
                &self.department_name(draft.department),
            ));
        }

        Ok(())
    }
}

fn invalid_reference(field: &str, id: i64) -> DomainError {
    DomainError::validation(field, format!("invalid id \"{id}\" - object does not exist"))
}

fn materialize(id: i64, draft: LossDraft) -> LossRecord {
    LossRecord {
        id,
        issue_date: draft.issue_date.unwrap_or_else(|| Utc::now().date_naive()),
        department: draft.department,
        affected_area: draft.affected_area,
        equipment_or_process_step: draft.equipment_or_process_step.trim().to_string(),
        description: draft.description,
        cause: draft.cause,
        event_type: draft.event_type,
        status: draft.status,
        date_solved: draft.date_solved,
        reporting_limit_area: draft.reporting_limit_area,
        reporting_limit: draft.reporting_limit,
    }
}

/// The entity store. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| DomainError::Internal("lock poisoned".to_string()))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| DomainError::Internal("lock poisoned".to_string()))
    }

    // ── name-only lookup tables ─────────────────────────────────────────────

    /// Rows in name order.
    pub fn lookup_list(&self, kind: LookupKind) -> DomainResult<Vec<LookupRow>> {
        let tables = self.read()?;
        let table = tables.name_table(kind)?;
        let mut rows: Vec<LookupRow> = table
            .rows
            .iter()
            .map(|(id, name)| LookupRow {
                id: *id,
                name: name.clone(),
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    pub fn lookup_get(&self, kind: LookupKind, id: i64) -> DomainResult<LookupRow> {
        let tables = self.read()?;
        let table = tables.name_table(kind)?;
        table
            .rows
            .get(&id)
            .map(|name| LookupRow {
                id,
                name: name.clone(),
            })
            .ok_or(DomainError::NotFound)
    }

    pub fn lookup_create(&self, kind: LookupKind, raw_name: &str) -> DomainResult<LookupRow> {
        let name = normalize_name(kind, raw_name)?;
        let mut tables = self.write()?;
        let table = tables.name_table_mut(kind)?;
        if table.name_taken(&name, None) {
            return Err(DomainError::validation("name", "this field must be unique"));
        }
        let id = table.allocate();
        table.rows.insert(id, name.clone());
        Ok(LookupRow { id, name })
    }

    pub fn lookup_update(&self, kind: LookupKind, id: i64, raw_name: &str) -> DomainResult<LookupRow> {
        let name = normalize_name(kind, raw_name)?;
        let mut tables = self.write()?;
        let table = tables.name_table_mut(kind)?;
        if !table.rows.contains_key(&id) {
            return Err(DomainError::NotFound);
        }
        if table.name_taken(&name, Some(id)) {
            return Err(DomainError::validation("name", "this field must be unique"));
        }
        table.rows.insert(id, name.clone());
        Ok(LookupRow { id, name })
    }

    pub fn lookup_delete(&self, kind: LookupKind, id: i64) -> DomainResult<()> {
        let mut tables = self.write()?;
        let name = match tables.name_table(kind)?.rows.get(&id) {
            Some(name) => name.clone(),
            None => return Err(DomainError::NotFound),
        };
        if tables.reference_count(kind, id) > 0 {
            return Err(DomainError::protected(format!(
                "cannot delete {kind} \"{name}\": other records still reference it"
            )));
        }
        tables.name_table_mut(kind)?.rows.remove(&id);
        Ok(())
    }

    // ── reporting limit areas ───────────────────────────────────────────────

    /// Areas with their owning department's name, ordered by department name
    /// then area name.
    pub fn limit_area_list(&self) -> DomainResult<Vec<(ReportingLimitArea, String)>> {
        let tables = self.read()?;
        let mut rows: Vec<(ReportingLimitArea, String)> = tables
            .limit_areas
            .keys()
            .filter_map(|id| tables.limit_area(*id))
            .map(|area| {
                let department_name = tables.department_name(area.department);
                (area, department_name)
            })
            .collect();
        rows.sort_by(|a, b| (&a.1, &a.0.name).cmp(&(&b.1, &b.0.name)));
        Ok(rows)
    }

    pub fn limit_area_get(&self, id: i64) -> DomainResult<(ReportingLimitArea, String)> {
        let tables = self.read()?;
        let area = tables.limit_area(id).ok_or(DomainError::NotFound)?;
        let department_name = tables.department_name(area.department);
        Ok((area, department_name))
    }

    pub fn limit_area_create(
        &self,
        raw_name: &str,
        department: i64,
    ) -> DomainResult<(ReportingLimitArea, String)> {
        let name = normalize_name(LookupKind::ReportingLimitArea, raw_name)?;
        let mut tables = self.write()?;
        if !tables.departments.rows.contains_key(&department) {
            return Err(invalid_reference("department", department));
        }
        if tables
            .limit_areas
            .values()
            .any(|row| row.name == name && row.department == department)
        {
            return Err(DomainError::validation(
                "name",
                "the fields name, department must make a unique set",
            ));
        }
        tables.next_limit_area_id += 1;
        let id = tables.next_limit_area_id;
        tables.limit_areas.insert(
            id,
            LimitRow {
                name: name.clone(),
                department,
            },
        );
        let department_name = tables.department_name(department);
        Ok((
            ReportingLimitArea {
                id,
                name,
                department,
            },
            department_name,
        ))
    }

    pub fn limit_area_update(
        &self,
        id: i64,
        raw_name: Option<&str>,
        department: Option<i64>,
    ) -> DomainResult<(ReportingLimitArea, String)> {
        let mut tables = self.write()?;
        let current = tables.limit_area(id).ok_or(DomainError::NotFound)?;

        let name = match raw_name {
            Some(raw) => normalize_name(LookupKind::ReportingLimitArea, raw)?,
            None => current.name,
        };
        let department = department.unwrap_or(current.department);

        if !tables.departments.rows.contains_key(&department) {
            return Err(invalid_reference("department", department));
        }
        if tables
            .limit_areas
            .iter()
            .any(|(other, row)| *other != id && row.name == name && row.department == department)
        {
            return Err(DomainError::validation(
                "name",
                "the fields name, department must make a unique set",
            ));
        }

        tables.limit_areas.insert(
            id,
            LimitRow {
                name: name.clone(),
                department,
            },
        );
        let department_name = tables.department_name(department);
        Ok((
            ReportingLimitArea {
                id,
                name,
                department,
            },
            department_name,
        ))
    }

    pub fn limit_area_delete(&self, id: i64) -> DomainResult<()> {
        let mut tables = self.write()?;
        let area = tables.limit_area(id).ok_or(DomainError::NotFound)?;
        if tables.reference_count(LookupKind::ReportingLimitArea, id) > 0 {
            return Err(DomainError::protected(format!(
                "cannot delete reportinglimitarea \"{}\": other records still reference it",
                area.name
            )));
        }
        tables.limit_areas.remove(&id);
        Ok(())
    }

    // ── loss records ────────────────────────────────────────────────────────

    /// Records ordered by issue date, newest first; ties broken by id, newest
    /// first.
    pub fn loss_list(&self) -> DomainResult<Vec<LossRecord>> {
        let tables = self.read()?;
        let mut records: Vec<LossRecord> = tables.losses.values().cloned().collect();
        records.sort_by(|a, b| (b.issue_date, b.id).cmp(&(a.issue_date, a.id)));
        Ok(records)
    }

    pub fn loss_get(&self, id: i64) -> DomainResult<LossRecord> {
        self.read()?
            .losses
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn loss_create(&self, draft: LossDraft) -> DomainResult<LossRecord> {
        let mut tables = self.write()?;
        tables.validate_loss(&draft)?;
        tables.next_loss_id += 1;
        let id = tables.next_loss_id;
        let record = materialize(id, draft);
        tables.losses.insert(id, record.clone());
        Ok(record)
    }

    pub fn loss_replace(&self, id: i64, draft: LossDraft) -> DomainResult<LossRecord> {
        let mut tables = self.write()?;
        if !tables.losses.contains_key(&id) {
            return Err(DomainError::NotFound);
        }
        tables.validate_loss(&draft)?;
        let record = materialize(id, draft);
        tables.losses.insert(id, record.clone());
        Ok(record)
    }

    pub fn loss_patch(&self, id: i64, patch: &LossPatch) -> DomainResult<LossRecord> {
        let mut tables = self.write()?;
        let current = tables.losses.get(&id).ok_or(DomainError::NotFound)?;
        let draft = current.patched(patch);
        tables.validate_loss(&draft)?;
        let record = materialize(id, draft);
        tables.losses.insert(id, record.clone());
        Ok(record)
    }

    pub fn loss_delete(&self, id: i64) -> DomainResult<()> {
        let mut tables = self.write()?;
        tables
            .losses
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use lossdesk_domain::loss::{EventType, LossStatus};

    use super::*;

    fn draft(department: i64, area: i64, cause: i64, limit_area: i64) -> LossDraft {
        LossDraft {
            issue_date: NaiveDate::from_ymd_opt(2024, 5, 20),
            department,
            affected_area: area,
            equipment_or_process_step: "Filler".to_string(),
            description: String::new(),
            cause,
            event_type: EventType::Unplanned,
            status: LossStatus::Ongoing,
            date_solved: None,
            reporting_limit_area: limit_area,
            reporting_limit: String::new(),
        }
    }

    /// Store with one row per table; returns (department, affected area,
    /// cause, limit area) ids.
    fn seeded() -> (Store, i64, i64, i64, i64) {
        let store = Store::new();
        let dept = store
            .lookup_create(LookupKind::Department, "Packaging")
            .unwrap();
        let area = store
            .lookup_create(LookupKind::AffectedArea, "Line 1")
            .unwrap();
        let cause = store.lookup_create(LookupKind::Cause, "Breakdown").unwrap();
        let (limit, _) = store.limit_area_create("North wing", dept.id).unwrap();
        (store, dept.id, area.id, cause.id, limit.id)
    }

    #[test]
    fn lookup_rows_listed_in_name_order() {
        let store = Store::new();
        store.lookup_create(LookupKind::Cause, "Wear").unwrap();
        store.lookup_create(LookupKind::Cause, "Breakdown").unwrap();
        store.lookup_create(LookupKind::Cause, "Operator error").unwrap();

        let names: Vec<String> = store
            .lookup_list(LookupKind::Cause)
            .unwrap()
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(names, vec!["Breakdown", "Operator error", "Wear"]);
    }

    #[test]
    fn duplicate_lookup_name_rejected() {
        let store = Store::new();
        store.lookup_create(LookupKind::Department, "Brewing").unwrap();
        let err = store
            .lookup_create(LookupKind::Department, "Brewing")
            .unwrap_err();
        assert_eq!(err.field(), Some("name"));
        assert_eq!(store.lookup_list(LookupKind::Department).unwrap().len(), 1);
    }

    #[test]
    fn rename_to_existing_name_rejected() {
        let store = Store::new();
        let a = store.lookup_create(LookupKind::Department, "Brewing").unwrap();
        store.lookup_create(LookupKind::Department, "Packaging").unwrap();

        assert!(store.lookup_update(LookupKind::Department, a.id, "Packaging").is_err());
        // Renaming to its own current name is fine.
        assert!(store.lookup_update(LookupKind::Department, a.id, "Brewing").is_ok());
    }

    #[test]
    fn limit_area_pair_uniqueness() {
        let store = Store::new();
        let brewing = store.lookup_create(LookupKind::Department, "Brewing").unwrap();
        let packaging = store
            .lookup_create(LookupKind::Department, "Packaging")
            .unwrap();

        store.limit_area_create("North wing", brewing.id).unwrap();
        // Same name under another department is a different area.
        assert!(store.limit_area_create("North wing", packaging.id).is_ok());
        // Same (name, department) pair is not.
        assert!(store.limit_area_create("North wing", brewing.id).is_err());
    }

    #[test]
    fn limit_area_requires_existing_department() {
        let store = Store::new();
        let err = store.limit_area_create("North wing", 42).unwrap_err();
        assert_eq!(err.field(), Some("department"));
    }

    #[test]
    fn department_with_limit_areas_is_protected() {
        let (store, dept, ..) = seeded();
        let err = store.lookup_delete(LookupKind::Department, dept).unwrap_err();
        assert!(matches!(err, DomainError::Protected(_)));
        // Both rows are still there.
        assert!(store.lookup_get(LookupKind::Department, dept).is_ok());
        assert_eq!(store.limit_area_list().unwrap().len(), 1);
    }

    #[test]
    fn referenced_lookups_protected_while_losses_exist() {
        let (store, dept, area, cause, limit) = seeded();
        store.loss_create(draft(dept, area, cause, limit)).unwrap();

        assert!(store.lookup_delete(LookupKind::AffectedArea, area).is_err());
        assert!(store.lookup_delete(LookupKind::Cause, cause).is_err());
        assert!(store.limit_area_delete(limit).is_err());

        store.loss_delete(1).unwrap();
        assert!(store.lookup_delete(LookupKind::AffectedArea, area).is_ok());
        assert!(store.lookup_delete(LookupKind::Cause, cause).is_ok());
        assert!(store.limit_area_delete(limit).is_ok());
    }

    #[test]
    fn loss_with_unknown_reference_rejected() {
        let (store, dept, area, _cause, limit) = seeded();
        let err = store.loss_create(draft(dept, area, 99, limit)).unwrap_err();
        assert_eq!(err.field(), Some("cause"));
        assert!(store.loss_list().unwrap().is_empty());
    }

    #[test]
    fn loss_with_foreign_limit_area_rejected() {
        let (store, dept, area, cause, _limit) = seeded();
        let other = store.lookup_create(LookupKind::Department, "Brewing").unwrap();
        let (foreign, _) = store.limit_area_create("South wing", other.id).unwrap();

        let err = store
            .loss_create(draft(dept, area, cause, foreign.id))
            .unwrap_err();
        assert_eq!(err.field(), Some("reporting_limit_area"));
        let msg = err.to_string();
        assert!(msg.contains("South wing (Brewing)"));
        assert!(msg.contains("Packaging"));
        assert!(store.loss_list().unwrap().is_empty());
    }

    #[test]
    fn loss_ids_are_sequential_and_date_defaults() {
        let (store, dept, area, cause, limit) = seeded();
        let mut d = draft(dept, area, cause, limit);
        d.issue_date = None;
        let record = store.loss_create(d).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.issue_date, Utc::now().date_naive());

        let second = store.loss_create(draft(dept, area, cause, limit)).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn loss_list_is_newest_first() {
        let (store, dept, area, cause, limit) = seeded();
        let mut older = draft(dept, area, cause, limit);
        older.issue_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        store.loss_create(older).unwrap();
        store.loss_create(draft(dept, area, cause, limit)).unwrap();
        store.loss_create(draft(dept, area, cause, limit)).unwrap();

        let ids: Vec<i64> = store.loss_list().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn patch_revalidates_the_whole_record() {
        let (store, dept, area, cause, limit) = seeded();
        let record = store.loss_create(draft(dept, area, cause, limit)).unwrap();

        let patch = LossPatch {
            status: Some(LossStatus::Finished),
            date_solved: NaiveDate::from_ymd_opt(2024, 5, 22),
            ..LossPatch::default()
        };
        let updated = store.loss_patch(record.id, &patch).unwrap();
        assert_eq!(updated.status, LossStatus::Finished);
        assert_eq!(updated.department, dept);

        // Pointing the record at a department that does not own its limit
        // area must fail and leave the stored row unchanged.
        let other = store.lookup_create(LookupKind::Department, "Brewing").unwrap();
        let bad = LossPatch {
            department: Some(other.id),
            ..LossPatch::default()
        };
        let err = store.loss_patch(record.id, &bad).unwrap_err();
        assert_eq!(err.field(), Some("reporting_limit_area"));
        assert_eq!(store.loss_get(record.id).unwrap().department, dept);
    }

    #[test]
    fn replace_requires_existing_record() {
        let (store, dept, area, cause, limit) = seeded();
        assert_eq!(
            store.loss_replace(7, draft(dept, area, cause, limit)),
            Err(DomainError::NotFound)
        );
    }
}
