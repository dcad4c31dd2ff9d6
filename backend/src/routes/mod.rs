pub mod preferences;
pub mod statistics;

#[cfg(test)]
mod tests {
    #[test]
    fn test_module_structure() {
        // Test that all route module constants are accessible
        assert_eq!(super::statistics::GET_STATISTIC, "get_statistic");
        assert_eq!(super::statistics::LIST_STATISTICS, "list_statistics");
        assert_eq!(
            super::preferences::GET_USER_PREFERENCE,
            "get_user_preference"
        );
    }
}
