//! Two-stage decoding of archive lines.
//!
//! Each line is a JSON envelope `{"xml": "..."}` whose string holds an XML
//! document with zero or more `metData` elements. The envelope is decoded
//! with `serde_json`, the document with `quick_xml`'s serde support, and the
//! raw element text is then converted field by field.

use meteo_core::error::{MeteoError, Result};
use meteo_core::models::ObservationRecord;
use meteo_core::time_utils::TimestampParser;
use serde::Deserialize;

// ── Wire types ────────────────────────────────────────────────────────────────

/// One line of an archive file.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveLine {
    /// The embedded XML document.
    pub xml: String,
}

/// The embedded document; the root element name is not checked.
#[derive(Debug, Default, Deserialize)]
struct MarkupDocument {
    #[serde(rename = "metData", default)]
    met_data: Vec<RawObservation>,
}

/// Text content of the `metData` children used by [`ObservationRecord`].
#[derive(Debug, Deserialize)]
struct RawObservation {
    #[serde(rename = "domain_meteosiId")]
    station_id: String,
    sunrise: String,
    sunset: String,
    #[serde(rename = "validStart")]
    valid_start: String,
    #[serde(rename = "validEnd")]
    valid_end: String,
    td: String,
    tavg: String,
    tx: String,
    tn: String,
    rhavg: String,
    ddavg_val: String,
    ddmax_val: String,
    ffavg_val: String,
    ffmax_val: String,
    mslavg: String,
    pavg: String,
    rr_val: String,
    tp_1h_acc: String,
    tp_24h_acc: String,
    snow: String,
    #[serde(rename = "gSunRadavg")]
    g_sun_radavg: String,
    #[serde(rename = "diffSunRadavg")]
    diff_sun_radavg: String,
    vis_val: String,
}

// ── RecordDecoder ─────────────────────────────────────────────────────────────

/// Decodes archive lines into [`ObservationRecord`]s.
pub struct RecordDecoder {
    timestamps: TimestampParser,
}

impl RecordDecoder {
    pub fn new(timestamps: TimestampParser) -> Self {
        Self { timestamps }
    }

    /// Decode one raw line (without its newline) into its records, in
    /// document order.
    pub fn decode_line(&self, line: &[u8]) -> Result<Vec<ObservationRecord>> {
        let envelope = decode_envelope(line)?;
        self.decode_markup(&envelope.xml)
    }

    /// Decode an XML document into its records, in document order.
    pub fn decode_markup(&self, xml: &str) -> Result<Vec<ObservationRecord>> {
        let document: MarkupDocument = quick_xml::de::from_str(xml)?;
        document
            .met_data
            .into_iter()
            .map(|raw| self.convert(raw))
            .collect()
    }

    fn convert(&self, raw: RawObservation) -> Result<ObservationRecord> {
        let time = |value: &str| self.timestamps.parse(value);

        Ok(ObservationRecord {
            sunrise: time(&raw.sunrise)?,
            sunset: time(&raw.sunset)?,
            interval_start: time(&raw.valid_start)?,
            interval_end: time(&raw.valid_end)?,
            temperature_dew_point: number("td", &raw.td)?,
            temperature_air_avg: number("tavg", &raw.tavg)?,
            temperature_air_max: number("tx", &raw.tx)?,
            temperature_air_min: number("tn", &raw.tn)?,
            humidity_relative_avg: number("rhavg", &raw.rhavg)?,
            wind_direction_avg: number("ddavg_val", &raw.ddavg_val)?,
            wind_direction_max_gust: number("ddmax_val", &raw.ddmax_val)?,
            wind_speed_avg: number("ffavg_val", &raw.ffavg_val)?,
            wind_speed_max: number("ffmax_val", &raw.ffmax_val)?,
            pressure_mean_sea_level_avg: number("mslavg", &raw.mslavg)?,
            pressure_surface_level_avg: number("pavg", &raw.pavg)?,
            precipitation_sum_10min: number("rr_val", &raw.rr_val)?,
            precipitation_sum_1h: number("tp_1h_acc", &raw.tp_1h_acc)?,
            precipitation_sum_24h: number("tp_24h_acc", &raw.tp_24h_acc)?,
            snow_cover_height: number("snow", &raw.snow)?,
            sun_radiation_global_avg: number("gSunRadavg", &raw.g_sun_radavg)?,
            sun_radiation_diffuse_avg: number("diffSunRadavg", &raw.diff_sun_radavg)?,
            visibility: number("vis_val", &raw.vis_val)?,
            station_id: raw.station_id,
        })
    }
}

/// Decode the JSON envelope of one line.
pub fn decode_envelope(line: &[u8]) -> Result<ArchiveLine> {
    Ok(serde_json::from_slice(line)?)
}

fn number(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| MeteoError::FieldParse {
            field,
            value: value.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
