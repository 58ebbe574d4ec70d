//! Column headers for each segment attribute, per sheet.
//!
//! Every field can be overridden from the settings file; omitted fields keep
//! the workbook's standard headers. `sequence` and `upstream_switch` are
//! optional columns: when absent, rows are numbered in file order and every
//! row starts at a switch.

use serde::{Deserialize, Serialize};

/// Headers on the main-line sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MainFieldMap {
    pub id: String,
    pub sequence: String,
    pub length_km: String,
    pub customers: String,
    pub line_model: String,
    pub upstream_switch: String,
    pub remote_operable: String,
}

impl Default for MainFieldMap {
    fn default() -> Self {
        Self {
            id: "线路分段".to_string(),
            sequence: "序号".to_string(),
            length_km: "长度(km)".to_string(),
            customers: "用户数量(台)".to_string(),
            line_model: "线路型号".to_string(),
            upstream_switch: "起点有无开关".to_string(),
            remote_operable: "起点是否自动化".to_string(),
        }
    }
}

/// Headers on the branch sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BranchFieldMap {
    pub id: String,
    pub sequence: String,
    pub branch_id: String,
    pub attach_to: String,
    pub length_km: String,
    pub customers: String,
    pub line_model: String,
    pub upstream_switch: String,
    pub remote_operable: String,
}

impl Default for BranchFieldMap {
    fn default() -> Self {
        Self {
            id: "分支分段".to_string(),
            sequence: "序号".to_string(),
            branch_id: "所属分支".to_string(),
            attach_to: "挂接主线分段".to_string(),
            length_km: "长度(km)".to_string(),
            customers: "用户数量(台)".to_string(),
            line_model: "线路型号".to_string(),
            upstream_switch: "起点有无开关".to_string(),
            remote_operable: "是否自动化".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldMappings {
    pub main: MainFieldMap,
    pub branch: BranchFieldMap,
}
