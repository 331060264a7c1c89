//! A catalog session: one document, its profiles and their parsed tables.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use beltcat_core::{
    CatalogError, Interpolator, Lookup, LookupOptions, ParseResult, ParseWarning, ParsedTable,
    PowerTable, Profile, ProfileCache, parse_table,
};
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::profiles::ProfileSet;
use crate::source::{TextSource, open_source};

/// A document plus the profiles that describe its tables.
///
/// Tables are parsed on first use and cached per profile until
/// [`invalidate`](Catalog::invalidate) or [`reload`](Catalog::reload). The
/// interpolator built over a cached table is kept with it.
pub struct Catalog {
    source: Box<dyn TextSource>,
    profiles: ProfileSet,
    cache: ProfileCache,
    warnings: HashMap<String, Vec<ParseWarning>>,
    /// Interpolators keyed by profile, with the table each was built from.
    interpolators: HashMap<String, (Arc<PowerTable>, Arc<Interpolator>)>,
    options: LookupOptions,
}

impl Catalog {
    /// Create a session over `source` with the given profiles.
    pub fn new(source: Box<dyn TextSource>, profiles: ProfileSet) -> Self {
        Self {
            source,
            profiles,
            cache: ProfileCache::new(),
            warnings: HashMap::new(),
            interpolators: HashMap::new(),
            options: LookupOptions::default(),
        }
    }

    /// Open a PDF or text document with the built-in profiles.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Ok(Self::new(open_source(path)?, ProfileSet::builtin()))
    }

    /// Replace the lookup options used by [`lookup`](Catalog::lookup).
    pub fn with_options(mut self, options: LookupOptions) -> Self {
        self.options = options;
        self.interpolators.clear();
        self
    }

    /// The configured profiles.
    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    /// The document source.
    pub fn source(&self) -> &dyn TextSource {
        self.source.as_ref()
    }

    /// Parse `profile`'s table from the document without caching it.
    pub fn parse(&self, profile: &str) -> Result<ParseResult<ParsedTable>, CatalogError> {
        let profile = self.profiles.get(profile)?;
        parse_from(self.source.as_ref(), profile)
    }

    /// `profile`'s table, parsed on first use.
    pub fn table(&mut self, profile: &str) -> Result<Arc<PowerTable>, CatalogError> {
        let config = self.profiles.get(profile)?;
        let source = self.source.as_ref();
        let warnings = &mut self.warnings;
        self.cache.get_or_load(profile, || {
            let parsed = parse_from(source, config)?;
            warnings.insert(config.id.clone(), parsed.warnings);
            Ok(parsed.value.table)
        })
    }

    /// Re-parse `profile`'s table and replace the cached one.
    ///
    /// If parsing fails, the previously cached table and its warnings stay
    /// in place.
    pub fn reload(&mut self, profile: &str) -> Result<Arc<PowerTable>, CatalogError> {
        let config = self.profiles.get(profile)?;
        let source = self.source.as_ref();
        let warnings = &mut self.warnings;
        let result = self.cache.reload(profile, || {
            let parsed = parse_from(source, config)?;
            warnings.insert(config.id.clone(), parsed.warnings);
            Ok(parsed.value.table)
        });
        match &result {
            Ok(_) => {
                self.interpolators.remove(profile);
            }
            Err(err) => warn!(profile, error = %err, "reload failed, keeping previous table"),
        }
        result
    }

    /// Drop `profile`'s cached table. Returns true if one was cached.
    pub fn invalidate(&mut self, profile: &str) -> bool {
        self.warnings.remove(profile);
        self.interpolators.remove(profile);
        self.cache.invalidate(profile)
    }

    /// Warnings from the parse that produced `profile`'s cached table.
    pub fn warnings(&self, profile: &str) -> &[ParseWarning] {
        self.warnings.get(profile).map(Vec::as_slice).unwrap_or_default()
    }

    /// Power for `(diameter, speed)` from `profile`'s table.
    ///
    /// Fails only if the table cannot be extracted; out-of-range and
    /// unanswerable queries come back as flagged [`Lookup`] values.
    pub fn lookup(
        &mut self,
        profile: &str,
        diameter: f64,
        speed: f64,
    ) -> Result<Lookup, CatalogError> {
        let policy = self.options.missing_corners;
        let interpolator = self.interpolator(profile)?;
        Ok(interpolator.lookup(diameter, speed, policy))
    }

    /// The interpolator over `profile`'s table, built once per cached table.
    pub fn interpolator(&mut self, profile: &str) -> Result<Arc<Interpolator>, CatalogError> {
        let table = self.table(profile)?;
        let cached = self
            .interpolators
            .get(profile)
            .filter(|(built_from, _)| Arc::ptr_eq(built_from, &table))
            .map(|(_, interpolator)| Arc::clone(interpolator));
        if let Some(interpolator) = cached {
            return Ok(interpolator);
        }
        let interpolator = Arc::new(Interpolator::new(&table, self.options.strategy));
        debug!(profile, kind = interpolator.kind(), "built interpolator");
        self.interpolators
            .insert(profile.to_string(), (table, Arc::clone(&interpolator)));
        Ok(interpolator)
    }
}

fn parse_from(
    source: &dyn TextSource,
    profile: &Profile,
) -> Result<ParseResult<ParsedTable>, CatalogError> {
    let text = source.text(profile.pages.as_deref())?;
    debug!(
        profile = %profile.id,
        pages = profile.pages.as_deref().unwrap_or("all"),
        chars = text.len(),
        "read profile text"
    );
    parse_table(&text, profile)
}
