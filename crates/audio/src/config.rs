//! Pipeline-Konfiguration
//!
//! Eine einzige, datengetriebene Konfiguration steuert beide Richtungen:
//! Transportrate, Interpolation, Anti-Aliasing, Puffergrenze, Blende und
//! die Aufbereitungsstufen je Richtung. Fehlende Felder fallen beim
//! Deserialisieren auf das `standard`-Preset zurueck.

use pcmstream_core::SampleRate;
use serde::{Deserialize, Serialize};

use crate::crossfade::STANDARD_BLENDE;
use crate::dsp::{AntiAliasFilter, CompressorConfig, HighShelfBoost, NormalizationStrategy};
use crate::error::{AudioError, AudioResult};
use crate::resample::Interpolation;

/// Aufbereitungsstufen einer Richtung, jeweils optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionerConfig {
    /// High-Shelf-Koeffizient in [0, 1)
    pub boost: Option<f32>,
    pub compressor: Option<CompressorConfig>,
    pub normalization: Option<NormalizationStrategy>,
}

impl ConditionerConfig {
    /// Keine Stufe aktiv
    pub fn ist_leer(&self) -> bool {
        self.boost.is_none() && self.compressor.is_none() && self.normalization.is_none()
    }

    pub fn validieren(&self) -> AudioResult<()> {
        if let Some(coeff) = self.boost {
            HighShelfBoost::new(coeff)?;
        }
        if let Some(compressor) = &self.compressor {
            compressor.validieren()?;
        }
        if let Some(strategy) = &self.normalization {
            strategy.validieren()?;
        }
        Ok(())
    }
}

/// Vollstaendige Konfiguration eines PCM-Prozessors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rate auf dem Transport (Capture-Ziel, Playback-Quelle)
    pub transport_rate: SampleRate,
    pub interpolation: Interpolation,
    /// 3-Tap-Kern fuer das Downsampling, `None` = kein Filter
    pub anti_alias: Option<[f32; 3]>,
    /// Obergrenze beider Ring-Buffer in Samples
    pub max_buffer_size: usize,
    /// Blendlaenge fuer Playback-Bloecke, `None` = keine Blende
    pub crossfade: Option<usize>,
    pub capture: ConditionerConfig,
    pub playback: ConditionerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl PipelineConfig {
    /// 16 kHz, linear, ohne Filter und Aufbereitung
    pub fn standard() -> Self {
        Self {
            transport_rate: SampleRate::HZ_16000,
            interpolation: Interpolation::Linear,
            anti_alias: None,
            max_buffer_size: SampleRate::HZ_16000.hz() as usize,
            crossfade: Some(STANDARD_BLENDE),
            capture: ConditionerConfig::default(),
            playback: ConditionerConfig::default(),
        }
    }

    /// 48 kHz, kubisch, breiter Filter, Kompressor in beiden Richtungen
    pub fn hohe_qualitaet() -> Self {
        let aufbereitung = ConditionerConfig {
            compressor: Some(CompressorConfig::default()),
            ..Default::default()
        };
        Self {
            transport_rate: SampleRate::HZ_48000,
            interpolation: Interpolation::Cubic,
            anti_alias: Some(AntiAliasFilter::BREIT),
            max_buffer_size: SampleRate::HZ_48000.hz() as usize,
            crossfade: Some(STANDARD_BLENDE),
            capture: aufbereitung.clone(),
            playback: aufbereitung,
        }
    }

    /// 16 kHz, kubisch, schmaler Filter, Hoehenanhebung und Zielpegel im Playback
    pub fn sprache() -> Self {
        Self {
            transport_rate: SampleRate::HZ_16000,
            interpolation: Interpolation::Cubic,
            anti_alias: Some(AntiAliasFilter::SCHMAL),
            max_buffer_size: SampleRate::HZ_16000.hz() as usize,
            crossfade: Some(STANDARD_BLENDE),
            capture: ConditionerConfig::default(),
            playback: ConditionerConfig {
                boost: Some(0.2),
                compressor: None,
                normalization: Some(NormalizationStrategy::sprache()),
            },
        }
    }

    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Prueft alle Werte; Fehler sind immer Konfigurationsfehler
    pub fn validieren(&self) -> AudioResult<()> {
        if self.max_buffer_size == 0 {
            return Err(AudioError::Konfiguration(
                "max_buffer_size muss groesser als 0 sein".into(),
            ));
        }
        self.anti_alias_filter()?;
        self.capture.validieren()?;
        self.playback.validieren()?;
        Ok(())
    }

    /// Baut den konfigurierten Anti-Aliasing-Filter
    pub fn anti_alias_filter(&self) -> AudioResult<Option<AntiAliasFilter>> {
        self.anti_alias.map(AntiAliasFilter::new).transpose()
    }

    /// Blendlaenge (0 = aus)
    pub fn crossfade_laenge(&self) -> usize {
        self.crossfade.unwrap_or(0)
    }
}

/// Benannte Presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Standard,
    HoheQualitaet,
    Sprache,
}

impl Preset {
    pub fn config(&self) -> PipelineConfig {
        match self {
            Preset::Standard => PipelineConfig::standard(),
            Preset::HoheQualitaet => PipelineConfig::hohe_qualitaet(),
            Preset::Sprache => PipelineConfig::sprache(),
        }
    }
}

/// Schrittweiser Aufbau einer `PipelineConfig`, ausgehend vom `standard`-Preset
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = preset.config();
        self
    }

    /// Setzt die Transportrate; die Puffergrenze folgt (eine Sekunde)
    pub fn transport_rate(mut self, rate: SampleRate) -> Self {
        self.config.transport_rate = rate;
        self.config.max_buffer_size = rate.hz() as usize;
        self
    }

    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.config.interpolation = interpolation;
        self
    }

    pub fn anti_alias(mut self, kernel: Option<[f32; 3]>) -> Self {
        self.config.anti_alias = kernel;
        self
    }

    pub fn max_buffer_size(mut self, samples: usize) -> Self {
        self.config.max_buffer_size = samples;
        self
    }

    pub fn crossfade(mut self, fade_length: Option<usize>) -> Self {
        self.config.crossfade = fade_length;
        self
    }

    pub fn capture(mut self, aufbereitung: ConditionerConfig) -> Self {
        self.config.capture = aufbereitung;
        self
    }

    pub fn playback(mut self, aufbereitung: ConditionerConfig) -> Self {
        self.config.playback = aufbereitung;
        self
    }

    /// Validiert und gibt die fertige Konfiguration zurueck
    pub fn build(self) -> AudioResult<PipelineConfig> {
        self.config.validieren()?;
        Ok(self.config)
    }
}
