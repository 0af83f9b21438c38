use chrono::{DateTime, Utc};

use crate::app::TaskDetail;
use crate::entities::{category, category_mapping, property, task};
use crate::error::AppError;
use crate::model::{CategoryResolution, ValidatedCategory};

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Accepts `#RRGGBB`, `#AARRGGBB`, `0x` prefixed hex or a decimal integer.
/// Values above `i32::MAX` wrap the way ARGB colors are stored.
pub fn parse_color(input: &str) -> Result<i32, AppError> {
    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"));
    let parsed = match hex {
        Some(digits)
            if (digits.len() == 6 || digits.len() == 8)
                && digits.chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            u32::from_str_radix(digits, 16).ok()
        }
        Some(_) => None,
        None => trimmed
            .parse::<i64>()
            .ok()
            .filter(|value| *value >= i64::from(i32::MIN) && *value <= i64::from(u32::MAX))
            .map(|value| value as u32),
    };
    parsed
        .map(|value| value as i32)
        .ok_or_else(|| AppError::InvalidArgument(format!("invalid color: {input}")))
}

pub fn format_color(color: Option<i32>) -> String {
    match color {
        None => "(none)".to_string(),
        Some(value) => {
            let raw = value as u32;
            if raw <= 0x00FF_FFFF {
                format!("#{raw:06X}")
            } else {
                format!("#{raw:08X}")
            }
        }
    }
}

pub fn format_task_line(task: &task::Model) -> String {
    format!(
        "[{}] {} ({}/{})",
        task.id, task.title, task.account_name, task.account_type
    )
}

pub fn format_category_line(category: &category::Model) -> String {
    format!(
        "[{}] {} {} ({}/{})",
        category.id,
        category.name,
        format_color(category.color),
        category.account_name,
        category.account_type
    )
}

pub fn format_relation_line(relation: &category_mapping::Model) -> String {
    format!(
        "[{}] task {} -> category {}",
        relation.id, relation.task_id, relation.category_id
    )
}

pub fn format_property_line(property: &property::Model) -> String {
    let category_id = property
        .category_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{}] category {} {} {}",
        property.id,
        category_id,
        property.category_name.as_deref().unwrap_or("-"),
        format_color(property.category_color)
    )
}

pub fn format_task_detail(detail: &TaskDetail) -> String {
    let mut output = String::new();
    output.push_str(&format!("Task ID: {}\n", detail.task.id));
    output.push_str(&format!("Title: {}\n", detail.task.title));
    output.push_str(&format!(
        "Account: {}/{}\n",
        detail.task.account_name, detail.task.account_type
    ));
    output.push_str(&format!(
        "Created: {}\n",
        format_datetime(detail.task.created_at)
    ));
    output.push('\n');
    if detail.categories.is_empty() {
        output.push_str("Categories: (none)\n");
    } else {
        output.push_str("Categories:\n");
        for category in &detail.categories {
            output.push_str(&format!("- {}\n", format_category_line(category)));
        }
    }
    if detail.properties.is_empty() {
        output.push_str("Properties: (none)");
        return output;
    }
    output.push_str("Properties:\n");
    for property in &detail.properties {
        output.push_str(&format!("- {}\n", format_property_line(property)));
    }
    output.trim_end().to_string()
}

pub fn format_resolution(validated: &ValidatedCategory) -> String {
    let Some(scope) = validated.account() else {
        return format!(
            "Task ID {} has no owning account; category resolution skipped",
            validated.values.task_id
        );
    };
    match &validated.resolution {
        Some(CategoryResolution::Existing { id, name, color }) => format!(
            "Existing category ID: {id}: {name} {} ({}/{})",
            format_color(*color),
            scope.name,
            scope.kind
        ),
        Some(CategoryResolution::New { name, color }) => format!(
            "New category: {} {} ({}/{})",
            name.as_deref().unwrap_or("(unnamed)"),
            format_color(*color),
            scope.name,
            scope.kind
        ),
        None => "Category resolution skipped".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_accepts_hex_and_decimal() {
        assert_eq!(parse_color("#FF0000").expect("rgb"), 0xFF0000);
        assert_eq!(parse_color("0x00ff00").expect("0x"), 0x00FF00);
        assert_eq!(parse_color("255").expect("decimal"), 255);
        assert_eq!(parse_color("-16776961").expect("negative"), -16776961);
        assert_eq!(parse_color("#FFFF0000").expect("argb"), 0xFFFF0000u32 as i32);
    }

    #[test]
    fn parse_color_rejects_garbage() {
        assert!(matches!(
            parse_color("#FFF"),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(parse_color("red").is_err());
        assert!(parse_color("#+FFFFF").is_err());
        assert!(parse_color("0x-FFFFF").is_err());
        assert!(parse_color("99999999999").is_err());
    }

    #[test]
    fn format_color_round_trips_common_values() {
        assert_eq!(format_color(Some(0xFF0000)), "#FF0000");
        assert_eq!(format_color(Some(0xFFFF0000u32 as i32)), "#FFFF0000");
        assert_eq!(format_color(None), "(none)");
    }
}
