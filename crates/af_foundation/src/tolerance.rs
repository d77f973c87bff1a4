// crates/af_foundation/src/tolerance.rs

//! 数值容差配置
//!
//! 集中定义数值计算中使用的容差阈值，通过参数注入传递，
//! 不使用全局静态变量。

/// 数值容差配置
///
/// 包含求解器核心使用的所有容差阈值，全部为 f64。
#[derive(Debug, Clone)]
pub struct NumericalTolerance {
    /// 安全除法阈值
    pub safe_div: f64,
    /// 单元体积最小值
    pub min_volume: f64,
    /// 面面积最小值
    pub min_face_area: f64,
    /// 限制器零斜率阈值
    pub gradient_eps: f64,
    /// 自由流保持判定阈值
    pub freestream_eps: f64,
}

impl Default for NumericalTolerance {
    fn default() -> Self {
        Self {
            safe_div: 1e-14,
            min_volume: 1e-14,
            min_face_area: 1e-14,
            gradient_eps: 1e-12,
            freestream_eps: 1e-10,
        }
    }
}

impl NumericalTolerance {
    /// 创建保守配置（更严格的阈值）
    pub fn conservative() -> Self {
        Self {
            safe_div: 1e-16,
            min_volume: 1e-16,
            min_face_area: 1e-16,
            gradient_eps: 1e-14,
            freestream_eps: 1e-12,
        }
    }
}
