use dnstree_domain::{DomainError, ResourceRecord, Zone, ZoneType};
use std::collections::BTreeSet;
use std::fmt::Write;

pub const ZONE_FILE_HEADER: &str = "; This zone file is autogenerated. DO NOT EDIT.";

/// Renders one (zone, view) record set as master-file text.
#[derive(Debug, Clone)]
pub struct ZoneRenderer {
    soa_required: Vec<ZoneType>,
}

impl ZoneRenderer {
    pub fn new(soa_required: Vec<ZoneType>) -> Self {
        Self { soa_required }
    }

    /// `records` may mix entries of the concrete view and of `any`; a
    /// concrete SOA replaces a wildcard one.
    ///
    /// # Errors
    ///
    /// * `DomainError::DuplicateSoa` - Two SOA records at the same scope
    /// * `DomainError::MissingSoa` - Records without an SOA for a zone type
    ///   that requires one
    /// * `DomainError::InvalidRecord` - An owner label that cannot be written
    /// * `DomainError::InvalidZoneType` - The zone's stored type does not parse
    pub fn render(
        &self,
        zone: &Zone,
        view: &str,
        records: &[ResourceRecord],
    ) -> Result<String, DomainError> {
        let soa = select_soa(zone, view, records)?;

        if soa.is_none()
            && !records.is_empty()
            && self.soa_required.contains(&zone.zone_type()?)
        {
            return Err(DomainError::MissingSoa {
                zone: zone.name.to_string(),
                view: view.to_string(),
            });
        }

        // Ordered by (type rank, owner, rdata); a record present under both
        // `any` and the concrete view collapses into one entry.
        let mut body: BTreeSet<(u8, &str, String, String)> = BTreeSet::new();
        for record in records.iter().filter(|r| !r.is_soa()) {
            record.validate_target()?;
            body.insert((
                record.record_type().render_rank(),
                record.target.as_ref(),
                record.data.rdata(),
                record.to_master_line(),
            ));
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", ZONE_FILE_HEADER);
        let _ = writeln!(out, "$ORIGIN {}", zone.origin);
        if let Some(soa) = soa {
            soa.validate_target()?;
            let _ = writeln!(out, "{}", soa.to_master_line());
        }

        for (_, _, _, line) in &body {
            let _ = writeln!(out, "{}", line);
        }

        Ok(out)
    }
}

fn select_soa<'a>(
    zone: &Zone,
    view: &str,
    records: &'a [ResourceRecord],
) -> Result<Option<&'a ResourceRecord>, DomainError> {
    let duplicate = || DomainError::DuplicateSoa {
        zone: zone.name.to_string(),
        view: view.to_string(),
    };

    let (wildcard, concrete): (Vec<&ResourceRecord>, Vec<&ResourceRecord>) = records
        .iter()
        .filter(|r| r.is_soa())
        .partition(|r| r.view.is_any());

    match (concrete.as_slice(), wildcard.as_slice()) {
        ([], []) => Ok(None),
        ([soa], _) => Ok(Some(soa)),
        ([], [soa]) => Ok(Some(soa)),
        _ => Err(duplicate()),
    }
}
