//! A builder for creating `Destination` instances for testing.

use crate::models::Destination;

/// A builder for creating `Destination` instances for testing.
#[derive(Debug, Clone)]
pub struct DestinationBuilder {
    status_channel_id: u64,
    alert_channel_id: u64,
    alert_role_id: u64,
}

impl Default for DestinationBuilder {
    fn default() -> Self {
        Self { status_channel_id: 1, alert_channel_id: 2, alert_role_id: 3 }
    }
}

impl DestinationBuilder {
    /// Creates a new `DestinationBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status channel id.
    pub fn status_channel_id(mut self, id: u64) -> Self {
        self.status_channel_id = id;
        self
    }

    /// Sets the alert channel id.
    pub fn alert_channel_id(mut self, id: u64) -> Self {
        self.alert_channel_id = id;
        self
    }

    /// Sets the alert role id.
    pub fn alert_role_id(mut self, id: u64) -> Self {
        self.alert_role_id = id;
        self
    }

    /// Builds the `Destination` with the provided values.
    pub fn build(self) -> Destination {
        Destination {
            status_channel_id: self.status_channel_id,
            alert_channel_id: self.alert_channel_id,
            alert_role_id: self.alert_role_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_builder() {
        let destination = DestinationBuilder::new()
            .status_channel_id(10)
            .alert_channel_id(20)
            .alert_role_id(30)
            .build();

        assert_eq!(destination.status_channel_id, 10);
        assert_eq!(destination.alert_channel_id, 20);
        assert_eq!(destination.alert_role_id, 30);
    }
}
