/*!
 * Driver registry for linedisp.
 *
 * This module maps driver names to [`Driver`] instances and binds a driver to
 * its configuration when it is opened.
 */
use std::collections::BTreeMap;
use std::panic;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use linedisp_core::config::DisplayConfig;
use linedisp_core::types::DriverConfig;

use crate::display::Display;
use crate::driver::Driver;
use crate::encoding::CodePage;
use crate::error::{DisplayError, RegistrationError, Result};
use crate::protocol::Protocol;
use crate::protocols;

/// A driver resolved by name, bound to a copy of its configuration
#[derive(Debug, Clone)]
pub struct Handle {
    name: String,
    driver: Arc<dyn Driver>,
    config: DriverConfig,
}

impl Handle {
    /// The name the driver was registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved driver
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// A snapshot of the bound configuration
    pub fn config(&self) -> DriverConfig {
        self.config.clone()
    }

    /// Open a display speaking `protocol` through this driver
    pub fn get_display(&self, protocol: Arc<dyn Protocol>) -> Result<Display> {
        self.driver.get_display(protocol, &self.config)
    }
}

/// Driver registry
#[derive(Debug, Default)]
pub struct DriverRegistry {
    /// Registered drivers, kept sorted by name
    drivers: RwLock<BTreeMap<String, Arc<dyn Driver>>>,
}

impl DriverRegistry {
    /// Create an empty driver registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the drivers built into this crate
    pub fn with_builtin_drivers() -> Self {
        let registry = Self::new();
        #[cfg(feature = "serial")]
        registry.register(crate::serial::NAME, crate::serial::SerialDriver::new());
        registry
    }

    /// Register `driver` under `name`.
    ///
    /// # Panics
    ///
    /// Panics with a [`RegistrationError`] payload if `name` is empty or
    /// already registered.
    pub fn register<D: Driver + 'static>(&self, name: &str, driver: D) {
        let driver: Arc<dyn Driver> = Arc::new(driver);
        self.register_shared(name, Some(driver));
    }

    /// Register a shared driver under `name`.
    ///
    /// # Panics
    ///
    /// As [`register`](Self::register), and also when `driver` is `None`.
    pub fn register_shared(&self, name: &str, driver: Option<Arc<dyn Driver>>) {
        if let Err(err) = self.try_insert(name, driver) {
            panic::panic_any(err);
        }
        debug!(driver = name, "Registered driver");
    }

    // The write guard is released before the caller panics, so a failed
    // registration never poisons the registry.
    fn try_insert(
        &self,
        name: &str,
        driver: Option<Arc<dyn Driver>>,
    ) -> std::result::Result<(), RegistrationError> {
        if name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        let driver = driver.ok_or_else(|| RegistrationError::MissingDriver(name.to_string()))?;
        let mut drivers = self.write();
        if drivers.contains_key(name) {
            return Err(RegistrationError::Duplicate(name.to_string()));
        }
        drivers.insert(name.to_string(), driver);
        Ok(())
    }

    /// Look up `name` and bind it to a copy of `config`
    pub fn open(&self, name: &str, config: &DriverConfig) -> Result<Handle> {
        let driver = self
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DisplayError::DriverNotFound(name.to_string()))?;
        debug!(driver = name, options = config.len(), "Opened driver handle");
        Ok(Handle {
            name: name.to_string(),
            driver,
            config: config.clone(),
        })
    }

    /// Open the display described by a configuration section: resolve the
    /// driver and protocol by name, open the display and apply the encoding.
    pub fn open_configured(&self, config: &DisplayConfig) -> Result<Display> {
        let protocol = protocols::lookup(&config.protocol)
            .ok_or_else(|| DisplayError::UnknownProtocol(config.protocol.clone()))?;
        let code_page = config
            .encoding
            .as_deref()
            .map(|label| {
                CodePage::for_label(label)
                    .ok_or_else(|| DisplayError::UnknownEncoding(label.to_string()))
            })
            .transpose()?;

        let display = self
            .open(&config.driver, &config.options)?
            .get_display(protocol)?;
        display.set_encoding(code_page);
        Ok(display)
    }

    /// Names of all registered drivers, sorted
    pub fn drivers(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Whether a driver is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Remove every registered driver. Intended for test isolation.
    pub fn clear(&self) {
        self.write().clear();
    }

    // No code panics while holding either guard, so poisoning cannot leave
    // the map half-updated.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<dyn Driver>>> {
        self.drivers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<dyn Driver>>> {
        self.drivers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A shared driver registry that can be cloned
#[derive(Debug, Clone, Default)]
pub struct SharedDriverRegistry(Arc<DriverRegistry>);

impl SharedDriverRegistry {
    /// Create a new shared driver registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a reference to the driver registry
    pub fn registry(&self) -> &DriverRegistry {
        &self.0
    }
}

impl From<DriverRegistry> for SharedDriverRegistry {
    fn from(registry: DriverRegistry) -> Self {
        Self(Arc::new(registry))
    }
}

impl AsRef<DriverRegistry> for SharedDriverRegistry {
    fn as_ref(&self) -> &DriverRegistry {
        self.registry()
    }
}

impl std::ops::Deref for SharedDriverRegistry {
    type Target = DriverRegistry;

    fn deref(&self) -> &DriverRegistry {
        self.registry()
    }
}
