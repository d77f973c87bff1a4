// crates/af_foundation/src/validation.rs

//! 运行时数值验证工具
//!
//! 提供轻量验证函数，失败时返回 [`AfError`]。
//! 求解器在载入外部数据（网格、状态文件）后调用这些检查，
//! 失败即终止，无恢复路径。

use crate::error::{AfError, AfResult};

/// 验证值为有限数
pub fn ensure_finite(
    value: f64,
    module: &'static str,
    routine: &'static str,
    what: &str,
) -> AfResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AfError::numerical(
            module,
            routine,
            format!("{what} 非有限值: {value}"),
        ))
    }
}

/// 验证值严格为正
pub fn ensure_positive(
    value: f64,
    module: &'static str,
    routine: &'static str,
    what: &str,
) -> AfResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AfError::numerical(
            module,
            routine,
            format!("{what} 必须为正: {value}"),
        ))
    }
}

/// 验证网格维度可用（至少 2x2 顶点，乘积不溢出）
pub fn ensure_grid_dims(imx: usize, jmx: usize, context: &str) -> AfResult<()> {
    if imx < 2 || jmx < 2 {
        return Err(AfError::allocation(
            format!("{context}: 维度过小，至少需要 2x2 顶点"),
            imx,
            jmx,
        ));
    }
    if imx.checked_mul(jmx).is_none() {
        return Err(AfError::allocation(
            format!("{context}: 维度乘积溢出"),
            imx,
            jmx,
        ));
    }
    Ok(())
}
