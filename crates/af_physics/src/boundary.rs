// crates/af_physics/src/boundary.rs

//! 幽灵单元边界条件
//!
//! 每个子步开始时通过单一入口 [`apply_ghost_conditions`] 重新填充
//! 幽灵环，内部再分派入口/出口/上下壁面。保持单一入口是契约：
//! 浸入边界协作方依赖一致的更新前状态。
//!
//! # 边界策略
//!
//! - 入口 (i = 0)：ρ、u、v 取自由流；压力超音速取 p∞，亚音速从内部外推
//! - 出口 (i = imx)：ρ、u、v 零梯度外推；压力超音速外推，亚音速取背压 p∞
//! - 上下壁面 (j = 0, jmx)：ρ、p 外推；速度按壁面处理方式镜像

use glam::DVec2;

use crate::field::{FlowField, FreeStream, Prim};
use crate::mesh::MeshMetrics;

/// 壁面速度处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallTreatment {
    /// 流动相切：内部速度关于壁面法向反射，平均法向分量为零（无粘滑移壁）
    #[default]
    Reflect,
    /// 无滑移：幽灵速度取内部速度的相反数，壁面速度为零（黏性壁）
    NoSlip,
    /// 直接复制内部速度（调试用）
    Extrapolate,
}

/// 将速度关于单位法向反射
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// 重新填充全部幽灵单元
///
/// # 参数
/// - `field`: 原始变量场（就地写入幽灵环）
/// - `free_stream`: 自由流参考状态（含超音速标志）
/// - `metrics`: 几何度量（壁面法向）
/// - `wall`: 壁面速度处理方式
pub fn apply_ghost_conditions(
    field: &mut FlowField,
    free_stream: &FreeStream,
    metrics: &MeshMetrics,
    wall: WallTreatment,
) {
    apply_inlet(field, free_stream);
    apply_exit(field, free_stream);
    apply_walls(field, metrics, wall);
}

/// 入口 (i = 0)
fn apply_inlet(field: &mut FlowField, free_stream: &FreeStream) {
    let jmx = field.jmx();
    for j in 1..jmx {
        let interior = field.prim(1, j);
        let pressure = if free_stream.supersonic {
            free_stream.prim.p
        } else {
            interior.p
        };
        field.set_prim(
            0,
            j,
            Prim {
                rho: free_stream.prim.rho,
                u: free_stream.prim.u,
                v: free_stream.prim.v,
                p: pressure,
            },
        );
    }
}

/// 出口 (i = imx)
fn apply_exit(field: &mut FlowField, free_stream: &FreeStream) {
    let (imx, jmx) = (field.imx(), field.jmx());
    for j in 1..jmx {
        let interior = field.prim(imx - 1, j);
        let pressure = if free_stream.supersonic {
            interior.p
        } else {
            // 亚音速出口施加背压
            free_stream.prim.p
        };
        field.set_prim(
            imx,
            j,
            Prim {
                rho: interior.rho,
                u: interior.u,
                v: interior.v,
                p: pressure,
            },
        );
    }
}

/// 上下壁面 (j = 0, j = jmx)
fn apply_walls(field: &mut FlowField, metrics: &MeshMetrics, wall: WallTreatment) {
    let (imx, jmx) = (field.imx(), field.jmx());
    for i in 1..imx {
        // 下壁面：内部单元 (i, 1)，壁面为 η 向面 (i, 1)
        let normal = DVec2::new(metrics.eta_nx[[i, 1]], metrics.eta_ny[[i, 1]]);
        let ghost = wall_ghost(field.prim(i, 1), normal, wall);
        field.set_prim(i, 0, ghost);

        // 上壁面：内部单元 (i, jmx−1)，壁面为 η 向面 (i, jmx)
        let normal = DVec2::new(metrics.eta_nx[[i, jmx]], metrics.eta_ny[[i, jmx]]);
        let ghost = wall_ghost(field.prim(i, jmx - 1), normal, wall);
        field.set_prim(i, jmx, ghost);
    }
}

/// 由内部状态计算壁面幽灵状态
fn wall_ghost(interior: Prim, normal: DVec2, wall: WallTreatment) -> Prim {
    let velocity = DVec2::new(interior.u, interior.v);
    let ghost_velocity = match wall {
        WallTreatment::Reflect => reflect_velocity(velocity, normal),
        WallTreatment::NoSlip => -velocity,
        WallTreatment::Extrapolate => velocity,
    };
    Prim {
        rho: interior.rho,
        u: ghost_velocity.x,
        v: ghost_velocity.y,
        p: interior.p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::GasModel;
    use crate::mesh::{CurvilinearMesh, MeshMetrics};
    use af_config::{FreeStreamConfig, GasConfig};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn setup(u_inf: f64) -> (FlowField, FreeStream, MeshMetrics) {
        let gas = GasModel::from_config(&GasConfig::default());
        let fs = FreeStream::new(
            &FreeStreamConfig {
                density: 1.225,
                x_speed: u_inf,
                y_speed: 0.0,
                pressure: 101325.0,
            },
            &gas,
        );
        let mesh = CurvilinearMesh::cartesian(5, 5, 1.0, 1.0).unwrap();
        let metrics = MeshMetrics::new(&mesh).unwrap();
        let field = FlowField::from_free_stream(5, 5, &fs);
        (field, fs, metrics)
    }

    #[test]
    fn test_subsonic_inlet_extrapolates_pressure() {
        let (mut field, fs, metrics) = setup(100.0);
        assert!(!fs.supersonic);
        field.set_prim(
            1,
            1,
            Prim {
                rho: 1.0,
                u: 50.0,
                v: 0.0,
                p: 9e4,
            },
        );
        apply_ghost_conditions(&mut field, &fs, &metrics, WallTreatment::Reflect);

        let ghost = field.prim(0, 1);
        // ρ、u、v 取自由流，压力外推
        assert!(approx_eq(ghost.rho, fs.prim.rho));
        assert!(approx_eq(ghost.u, fs.prim.u));
        assert!(approx_eq(ghost.p, 9e4));
    }

    #[test]
    fn test_supersonic_inlet_full_dirichlet() {
        let (mut field, fs, metrics) = setup(500.0);
        assert!(fs.supersonic);
        field.set_prim(
            1,
            1,
            Prim {
                rho: 1.0,
                u: 400.0,
                v: 0.0,
                p: 9e4,
            },
        );
        apply_ghost_conditions(&mut field, &fs, &metrics, WallTreatment::Reflect);
        assert!(approx_eq(field.prim(0, 1).p, fs.prim.p));
    }

    #[test]
    fn test_subsonic_exit_back_pressure() {
        let (mut field, fs, metrics) = setup(100.0);
        field.set_prim(
            4,
            2,
            Prim {
                rho: 1.1,
                u: 90.0,
                v: 1.0,
                p: 9.5e4,
            },
        );
        apply_ghost_conditions(&mut field, &fs, &metrics, WallTreatment::Reflect);

        let ghost = field.prim(5, 2);
        // ρ、u、v 外推，压力取背压
        assert!(approx_eq(ghost.rho, 1.1));
        assert!(approx_eq(ghost.u, 90.0));
        assert!(approx_eq(ghost.v, 1.0));
        assert!(approx_eq(ghost.p, fs.prim.p));
    }

    #[test]
    fn test_supersonic_exit_extrapolates_pressure() {
        let (mut field, fs, metrics) = setup(500.0);
        field.set_prim(
            4,
            2,
            Prim {
                rho: 1.1,
                u: 450.0,
                v: 0.0,
                p: 9.5e4,
            },
        );
        apply_ghost_conditions(&mut field, &fs, &metrics, WallTreatment::Reflect);
        assert!(approx_eq(field.prim(5, 2).p, 9.5e4));
    }

    #[test]
    fn test_wall_reflection_cancels_normal_velocity() {
        let (mut field, fs, metrics) = setup(100.0);
        field.set_prim(
            2,
            1,
            Prim {
                rho: 1.2,
                u: 80.0,
                v: -5.0,
                p: 1e5,
            },
        );
        apply_ghost_conditions(&mut field, &fs, &metrics, WallTreatment::Reflect);

        let ghost = field.prim(2, 0);
        // 笛卡尔网格下壁面法向 (0, 1)：切向保持，法向反号
        assert!(approx_eq(ghost.u, 80.0));
        assert!(approx_eq(ghost.v, 5.0));
        // 内外平均法向速度为零
        assert!(approx_eq(0.5 * (ghost.v + (-5.0)), 0.0));
        assert!(approx_eq(ghost.rho, 1.2));
        assert!(approx_eq(ghost.p, 1e5));
    }

    #[test]
    fn test_wall_no_slip_negates_velocity() {
        let (mut field, fs, metrics) = setup(100.0);
        field.set_prim(
            2,
            4,
            Prim {
                rho: 1.2,
                u: 80.0,
                v: -5.0,
                p: 1e5,
            },
        );
        apply_ghost_conditions(&mut field, &fs, &metrics, WallTreatment::NoSlip);

        let ghost = field.prim(2, 5);
        // 壁面平均速度为零
        assert!(approx_eq(ghost.u, -80.0));
        assert!(approx_eq(ghost.v, 5.0));
    }

    #[test]
    fn test_reflect_velocity_oblique_normal() {
        let n = DVec2::new(std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2);
        let v = DVec2::new(1.0, 0.0);
        let r = reflect_velocity(v, n);
        // 反射后法向分量反号，幅值保持
        assert!(approx_eq(r.dot(n), -v.dot(n)));
        assert!(approx_eq(r.length(), v.length()));
    }
}
