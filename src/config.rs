//! Display configuration types and builder

use crate::command::{
    CHARGE_PUMP_DISABLE, CHARGE_PUMP_ENABLE, COM_SCAN_NORMAL, COM_SCAN_REMAPPED,
    SEGMENT_REMAP_OFF, SEGMENT_REMAP_ON,
};
pub use crate::error::BuilderError;

/// Column count of the SH1106 display RAM
///
/// Panels with 128 columns are usually centered in this RAM, which is why
/// the default column offset is 2.
pub const MAX_COLUMNS: u16 = 132;

/// Row count (COM outputs) of the SH1106
pub const MAX_ROWS: u16 = 64;

/// Rows covered by one page
pub const PAGE_HEIGHT: u16 = 8;

/// Number of pages the SH1106 can address
pub const MAX_PAGES: u16 = MAX_ROWS / PAGE_HEIGHT;

/// Panel geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Width in pixels (columns)
    pub width: u16,
    /// Height in pixels (rows)
    pub height: u16,
}

impl Geometry {
    /// Create a new geometry with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidGeometry` if:
    /// - width is 0 or greater than MAX_COLUMNS
    /// - height is 0 or greater than MAX_ROWS
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_COLUMNS || height == 0 || height > MAX_ROWS {
            return Err(BuilderError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    /// Bytes per scan row in the row-major bitmap, `ceil(width / 8)`
    pub fn line_length(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Calculate required frame buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        self.line_length() * self.height as usize
    }

    /// Number of 8-row pages, `ceil(height / 8)`
    pub fn page_count(&self) -> u16 {
        self.height.div_ceil(PAGE_HEIGHT)
    }

    /// Rows covered by `page`
    ///
    /// Every page covers 8 rows except a partial last page, which covers
    /// `height % 8` rows.
    pub fn rows_in_page(&self, page: u16) -> u16 {
        let remainder = self.height % PAGE_HEIGHT;
        if page + 1 == self.page_count() && remainder != 0 {
            remainder
        } else {
            PAGE_HEIGHT
        }
    }
}

/// Default parameter set for a supported controller variant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProfileDefaults {
    /// Default panel geometry
    pub geometry: Geometry,
    /// VCOMH deselect level
    pub vcomh: u8,
    /// Clock divide ratio (1-16)
    pub dclk_div: u8,
    /// Oscillator frequency setting (0-15)
    pub dclk_frq: u8,
    /// Multiplex ratio (active rows minus one)
    pub multiplex_ratio: u8,
    /// Pre-charge phase 1 period
    pub precharge_phase1: u8,
    /// Pre-charge phase 2 period
    pub precharge_phase2: u8,
    /// Whether the internal charge pump drives the panel
    pub charge_pump: bool,
    /// Column where the panel's first pixel sits in display RAM
    pub column_offset: u8,
}

/// Supported controller variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerProfile {
    /// Sinowealth SH1106 on I2C
    #[default]
    Sh1106,
}

impl ControllerProfile {
    /// Look up a profile by device-tree style compatible string
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::UnknownCompatible` if no profile matches.
    pub fn from_compatible(compatible: &str) -> Result<Self, BuilderError> {
        match compatible {
            "sinowealth,sh1106fb-i2c" => Ok(Self::Sh1106),
            _ => Err(BuilderError::UnknownCompatible),
        }
    }

    /// Compatible string of this profile
    pub fn compatible(self) -> &'static str {
        match self {
            Self::Sh1106 => "sinowealth,sh1106fb-i2c",
        }
    }

    /// Default parameters of this profile
    pub fn defaults(self) -> ProfileDefaults {
        match self {
            Self::Sh1106 => ProfileDefaults {
                geometry: Geometry {
                    width: 96,
                    height: 16,
                },
                vcomh: 0x30,
                dclk_div: 1,
                dclk_frq: 8,
                multiplex_ratio: 0x3F,
                precharge_phase1: 1,
                precharge_phase2: 15,
                charge_pump: true,
                column_offset: 2,
            },
        }
    }
}

/// Display configuration (device parameters)
///
/// Established once at attach. Only the contrast changes afterwards, and
/// the live value is tracked by [`Display`](crate::Display); `contrast` here
/// is the value programmed by the initialization sequence.
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Panel geometry
    pub geometry: Geometry,
    /// Controller variant the defaults came from
    pub profile: ControllerProfile,
    /// First controller page used by the panel
    pub page_offset: u8,
    /// Vertical display offset in rows
    pub com_offset: u8,
    /// First controller column used by the panel
    pub column_offset: u8,
    /// Clock divide ratio (1-16)
    pub dclk_div: u8,
    /// Oscillator frequency setting (0-15)
    pub dclk_frq: u8,
    /// Multiplex ratio (active rows minus one)
    pub multiplex_ratio: u8,
    /// Pre-charge phase 1 period (1-15)
    pub precharge_phase1: u8,
    /// Pre-charge phase 2 period (1-15)
    pub precharge_phase2: u8,
    /// VCOMH deselect level
    pub vcomh: u8,
    /// Initial contrast
    pub contrast: u8,
    /// Enable the internal charge pump
    pub charge_pump: bool,
    /// Map column 0 to SEG131
    pub seg_remap: bool,
    /// Sequential (instead of alternative) COM pin configuration
    pub com_seq: bool,
    /// Left/right COM remap
    pub com_lrremap: bool,
    /// Invert the profile's COM scan direction
    pub com_invdir: bool,
    /// Area color mode requested by the board description
    pub area_color_enable: bool,
    /// Low power mode requested by the board description
    pub low_power: bool,
    /// Optional 4-byte lookup table from the board description
    pub lookup_table: Option<[u8; 4]>,
    /// Deferred refresh rate in Hz
    pub refresh_rate_hz: u32,
}

impl Config {
    /// Clock divide / oscillator frequency argument byte
    pub fn clock_divide_byte(&self) -> u8 {
        ((self.dclk_frq & 0x0F) << 4) | (self.dclk_div.wrapping_sub(1) & 0x0F)
    }

    /// Pre-charge period argument byte
    pub fn precharge_byte(&self) -> u8 {
        ((self.precharge_phase2 & 0x0F) << 4) | (self.precharge_phase1 & 0x0F)
    }

    /// COM pins hardware configuration argument byte
    pub fn com_pins_byte(&self) -> u8 {
        let alternative = if self.com_seq { 0x00 } else { 0x10 };
        let lrremap = if self.com_lrremap { 0x20 } else { 0x00 };
        0x02 | alternative | lrremap
    }

    /// Charge pump argument byte
    pub fn charge_pump_byte(&self) -> u8 {
        if self.charge_pump {
            CHARGE_PUMP_ENABLE
        } else {
            CHARGE_PUMP_DISABLE
        }
    }

    /// Segment remap command
    pub fn segment_remap_command(&self) -> u8 {
        if self.seg_remap {
            SEGMENT_REMAP_ON
        } else {
            SEGMENT_REMAP_OFF
        }
    }

    /// COM output scan direction command
    pub fn com_scan_command(&self) -> u8 {
        if self.com_invdir {
            COM_SCAN_NORMAL
        } else {
            COM_SCAN_REMAPPED
        }
    }

    /// Deferred refresh interval in milliseconds
    pub fn refresh_interval_ms(&self) -> u32 {
        1000 / self.refresh_rate_hz.max(1)
    }

    /// Check every field against what the controller accepts
    ///
    /// Run by [`Builder::build`] and again by
    /// [`Display::init`](crate::Display::init), since the fields are public.
    ///
    /// # Errors
    ///
    /// Returns a `BuilderError` if the geometry is out of range, a timing
    /// value is outside the range the controller accepts, the page or column
    /// offset does not leave room for the whole panel in display RAM, or the
    /// refresh rate is zero.
    pub fn validate(&self) -> Result<(), BuilderError> {
        let geometry = Geometry::new(self.geometry.width, self.geometry.height)?;
        if !(1..=16).contains(&self.dclk_div) {
            return Err(BuilderError::InvalidClockDivider(self.dclk_div));
        }
        if self.dclk_frq > 0x0F {
            return Err(BuilderError::InvalidClockFrequency(self.dclk_frq));
        }
        if self.multiplex_ratio > 0x3F {
            return Err(BuilderError::InvalidMultiplexRatio(self.multiplex_ratio));
        }
        if !(1..=15).contains(&self.precharge_phase1) || !(1..=15).contains(&self.precharge_phase2)
        {
            return Err(BuilderError::InvalidPrecharge {
                phase1: self.precharge_phase1,
                phase2: self.precharge_phase2,
            });
        }
        if u16::from(self.page_offset) + geometry.page_count() > MAX_PAGES {
            return Err(BuilderError::InvalidPageOffset(self.page_offset));
        }
        if u16::from(self.column_offset) + geometry.width > MAX_COLUMNS {
            return Err(BuilderError::InvalidColumnOffset(self.column_offset));
        }
        if self.refresh_rate_hz == 0 {
            return Err(BuilderError::InvalidRefreshRate);
        }
        Ok(())
    }
}

/// Builder for constructing display configuration
///
/// Every field starts from the [`ControllerProfile`] defaults; validation
/// happens in [`build`](Builder::build).
///
/// # Example
///
/// ```rust,no_run
/// use sh1106::{Builder, Geometry};
///
/// let geometry = match Geometry::new(128, 64) {
///     Ok(geometry) => geometry,
///     Err(_) => return,
/// };
/// let config = match Builder::new().geometry(geometry).contrast(0xCF).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    /// Variant the defaults were taken from
    profile: ControllerProfile,
    /// Panel geometry
    geometry: Geometry,
    /// First controller page used by the panel
    page_offset: u8,
    /// Vertical display offset in rows
    com_offset: u8,
    /// First controller column used by the panel
    column_offset: u8,
    /// Clock divide ratio
    dclk_div: u8,
    /// Oscillator frequency setting
    dclk_frq: u8,
    /// Multiplex ratio
    multiplex_ratio: u8,
    /// Pre-charge phase 1 period
    precharge_phase1: u8,
    /// Pre-charge phase 2 period
    precharge_phase2: u8,
    /// VCOMH deselect level
    vcomh: u8,
    /// Initial contrast
    contrast: u8,
    /// Enable the internal charge pump
    charge_pump: bool,
    /// Segment remap
    seg_remap: bool,
    /// Sequential COM pin configuration
    com_seq: bool,
    /// Left/right COM remap
    com_lrremap: bool,
    /// Inverted COM scan direction
    com_invdir: bool,
    /// Area color mode
    area_color_enable: bool,
    /// Low power mode
    low_power: bool,
    /// Lookup table
    lookup_table: Option<[u8; 4]>,
    /// Deferred refresh rate in Hz
    refresh_rate_hz: u32,
}

/// Contrast programmed at init unless overridden
pub const DEFAULT_CONTRAST: u8 = 127;

/// Deferred refresh rate unless overridden
pub const DEFAULT_REFRESH_RATE_HZ: u32 = 1;

impl Default for Builder {
    fn default() -> Self {
        Self::from_profile(ControllerProfile::default())
    }
}

impl Builder {
    /// Create a new Builder with SH1106 defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Builder seeded with the defaults of `profile`
    pub fn from_profile(profile: ControllerProfile) -> Self {
        let defaults = profile.defaults();
        Self {
            profile,
            geometry: defaults.geometry,
            page_offset: 0,
            com_offset: 0,
            column_offset: defaults.column_offset,
            dclk_div: defaults.dclk_div,
            dclk_frq: defaults.dclk_frq,
            multiplex_ratio: defaults.multiplex_ratio,
            precharge_phase1: defaults.precharge_phase1,
            precharge_phase2: defaults.precharge_phase2,
            vcomh: defaults.vcomh,
            contrast: DEFAULT_CONTRAST,
            charge_pump: defaults.charge_pump,
            seg_remap: true,
            com_seq: false,
            com_lrremap: false,
            com_invdir: false,
            area_color_enable: false,
            low_power: false,
            lookup_table: None,
            refresh_rate_hz: DEFAULT_REFRESH_RATE_HZ,
        }
    }

    /// Set panel geometry
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the first controller page used by the panel
    pub fn page_offset(mut self, value: u8) -> Self {
        self.page_offset = value;
        self
    }

    /// Set the vertical display offset
    pub fn com_offset(mut self, value: u8) -> Self {
        self.com_offset = value;
        self
    }

    /// Set the first controller column used by the panel
    ///
    /// The offset plus the panel width must fit in the 132 column RAM.
    pub fn column_offset(mut self, value: u8) -> Self {
        self.column_offset = value;
        self
    }

    /// Set the clock divide ratio (1-16)
    pub fn dclk_div(mut self, value: u8) -> Self {
        self.dclk_div = value;
        self
    }

    /// Set the oscillator frequency (0-15)
    pub fn dclk_frq(mut self, value: u8) -> Self {
        self.dclk_frq = value;
        self
    }

    /// Set the multiplex ratio
    pub fn multiplex_ratio(mut self, value: u8) -> Self {
        self.multiplex_ratio = value;
        self
    }

    /// Set pre-charge phase 1 and phase 2 periods
    pub fn precharge(mut self, phase1: u8, phase2: u8) -> Self {
        self.precharge_phase1 = phase1;
        self.precharge_phase2 = phase2;
        self
    }

    /// Set VCOMH deselect level
    pub fn vcomh(mut self, value: u8) -> Self {
        self.vcomh = value;
        self
    }

    /// Set initial contrast
    pub fn contrast(mut self, value: u8) -> Self {
        self.contrast = value;
        self
    }

    /// Enable or disable the internal charge pump
    pub fn charge_pump(mut self, value: bool) -> Self {
        self.charge_pump = value;
        self
    }

    /// Set segment remap
    ///
    /// Boards that wire column 0 to SEG0 set this to false.
    pub fn seg_remap(mut self, value: bool) -> Self {
        self.seg_remap = value;
        self
    }

    /// Use sequential COM pin configuration
    pub fn com_seq(mut self, value: bool) -> Self {
        self.com_seq = value;
        self
    }

    /// Enable left/right COM remap
    pub fn com_lrremap(mut self, value: bool) -> Self {
        self.com_lrremap = value;
        self
    }

    /// Invert the COM scan direction
    pub fn com_invdir(mut self, value: bool) -> Self {
        self.com_invdir = value;
        self
    }

    /// Request area color mode
    pub fn area_color_enable(mut self, value: bool) -> Self {
        self.area_color_enable = value;
        self
    }

    /// Request low power mode
    pub fn low_power(mut self, value: bool) -> Self {
        self.low_power = value;
        self
    }

    /// Set the lookup table
    pub fn lookup_table(mut self, table: [u8; 4]) -> Self {
        self.lookup_table = Some(table);
        self
    }

    /// Set the deferred refresh rate in Hz
    pub fn refresh_rate_hz(mut self, value: u32) -> Self {
        self.refresh_rate_hz = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// See [`Config::validate`].
    pub fn build(self) -> Result<Config, BuilderError> {
        let config = Config {
            geometry: self.geometry,
            profile: self.profile,
            page_offset: self.page_offset,
            com_offset: self.com_offset,
            column_offset: self.column_offset,
            dclk_div: self.dclk_div,
            dclk_frq: self.dclk_frq,
            multiplex_ratio: self.multiplex_ratio,
            precharge_phase1: self.precharge_phase1,
            precharge_phase2: self.precharge_phase2,
            vcomh: self.vcomh,
            contrast: self.contrast,
            charge_pump: self.charge_pump,
            seg_remap: self.seg_remap,
            com_seq: self.com_seq,
            com_lrremap: self.com_lrremap,
            com_invdir: self.com_invdir,
            area_color_enable: self.area_color_enable,
            low_power: self.low_power,
            lookup_table: self.lookup_table,
            refresh_rate_hz: self.refresh_rate_hz,
        };
        config.validate()?;
        Ok(config)
    }
}
