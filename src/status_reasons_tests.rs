// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `status_reasons` module

#[cfg(test)]
mod tests {
    use crate::status_reasons::*;

    #[test]
    fn test_condition_types_match_deployment_conventions() {
        assert_eq!(CONDITION_TYPE_AVAILABLE, "Available");
        assert_eq!(CONDITION_TYPE_PROGRESSING, "Progressing");
        assert_eq!(CONDITION_TYPE_DEGRADED, "Degraded");
    }

    #[test]
    fn test_condition_statuses() {
        assert_eq!(CONDITION_STATUS_TRUE, "True");
        assert_eq!(CONDITION_STATUS_FALSE, "False");
        assert_eq!(CONDITION_STATUS_UNKNOWN, "Unknown");
    }

    #[test]
    fn test_reasons_are_camel_case() {
        let reasons = [
            REASON_ALL_REPLICAS_AVAILABLE,
            REASON_MINIMUM_REPLICAS_UNAVAILABLE,
            REASON_DEPLOYMENT_CREATED,
            REASON_SCALING_REPLICA_SET,
            REASON_REPLICAS_CONVERGED,
            REASON_CONFIGURATION_VALID,
            REASON_CONFIGURATION_INVALID,
        ];

        for reason in reasons {
            assert!(
                reason.chars().next().is_some_and(|c| c.is_ascii_uppercase()),
                "{reason} should start with an uppercase letter"
            );
            assert!(
                reason.chars().all(|c| c.is_ascii_alphanumeric()),
                "{reason} should contain no separators"
            );
        }
    }
}
