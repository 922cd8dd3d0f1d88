//! Per-station evaluation pipeline and parallel batch helper
//!
//! One call decodes both reports, scores and classifies them, and runs the
//! OM policy evaluator — a pure, synchronous function of its inputs. Batch
//! evaluation fans stations out with rayon: there is no shared mutable
//! state, only the read-only lookup tables.

use rayon::prelude::*;
use tracing::info;

use crate::assessment::assess_station;
use crate::decoder::{decode, DecodedReport};
use crate::error::EngineError;
use crate::policy::evaluate_policy;
use crate::types::{
    ApproachMinima, MinimaTable, RawReport, ReportKind, RunwayEnd, RunwayTable,
    StationAssessment,
};

/// The report pair supplied for one station. Either side may be absent,
/// but not both.
#[derive(Debug, Clone)]
pub struct StationReports {
    pub metar: Option<RawReport>,
    pub taf: Option<RawReport>,
}

impl StationReports {
    /// Station identifier of whichever report is present
    pub fn station(&self) -> Option<&str> {
        self.metar
            .as_ref()
            .or(self.taf.as_ref())
            .map(RawReport::station)
    }
}

/// Evaluate one station from its report pair plus optional runway geometry
/// and approach minima.
///
/// Fails fast on caller misuse (no reports, mismatched stations, a TAF
/// passed as a METAR); report *content* never fails.
pub fn evaluate_station(
    reports: &StationReports,
    runway_ends: Option<&[RunwayEnd]>,
    minima: Option<&ApproachMinima>,
) -> Result<StationAssessment, EngineError> {
    validate_pair(reports)?;
    let station = reports
        .station()
        .ok_or(EngineError::NoReports)?
        .to_string();

    let metar: Option<DecodedReport> = reports.metar.clone().map(decode);
    let taf: Option<DecodedReport> = reports.taf.clone().map(decode);

    let severity = assess_station(
        metar.as_ref().map(|d| &d.observation),
        taf.as_ref().map(|d| &d.observation),
    );
    let advisory = evaluate_policy(metar.as_ref(), taf.as_ref(), runway_ends);
    let minima_band = minima.zip(metar.as_ref()).map(|(minima, decoded)| {
        minima.band(
            decoded.observation.visibility_meters,
            decoded.observation.ceiling_feet,
        )
    });

    info!(
        station = %station,
        score = severity.score,
        alert = %severity.alert_level,
        to_prohibited = advisory.to_prohibited,
        "Station evaluated"
    );

    Ok(StationAssessment {
        station,
        metar: metar.map(|d| d.observation),
        taf: taf.map(|d| d.observation),
        severity,
        advisory,
        minima_band,
    })
}

/// Evaluate many stations in parallel. Each station is independent; the
/// lookup tables are shared read-only.
pub fn evaluate_batch(
    items: &[StationReports],
    runways: Option<&RunwayTable>,
    minima: Option<&MinimaTable>,
) -> Vec<Result<StationAssessment, EngineError>> {
    items
        .par_iter()
        .map(|reports| {
            let station = reports.station().ok_or(EngineError::NoReports)?;
            let ends = runways.and_then(|t| t.ends_for(station));
            let station_minima = minima.and_then(|t| t.minima_for(station));
            evaluate_station(reports, ends, station_minima)
        })
        .collect()
}

fn validate_pair(reports: &StationReports) -> Result<(), EngineError> {
    match (&reports.metar, &reports.taf) {
        (None, None) => Err(EngineError::NoReports),
        (metar, taf) => {
            if let Some(m) = metar {
                if m.kind() != ReportKind::Metar {
                    return Err(EngineError::KindMismatch {
                        expected: ReportKind::Metar.to_string(),
                        got: m.kind().to_string(),
                    });
                }
            }
            if let Some(t) = taf {
                if t.kind() != ReportKind::Taf {
                    return Err(EngineError::KindMismatch {
                        expected: ReportKind::Taf.to_string(),
                        got: t.kind().to_string(),
                    });
                }
            }
            if let (Some(m), Some(t)) = (metar, taf) {
                if m.station() != t.station() {
                    return Err(EngineError::StationMismatch {
                        metar: m.station().to_string(),
                        taf: t.station().to_string(),
                    });
                }
            }
            Ok(())
        }
    }
}
