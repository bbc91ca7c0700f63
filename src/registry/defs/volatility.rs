//! Volatility criteria — trading ranges, dispersion, distance to extremes

use super::range_sub;
use crate::registry::criterion::{CriterionDef, Group, Scale};

const G: Group = Group::Volatility;

pub(crate) fn definitions() -> Vec<CriterionDef> {
    let bien_do = ("bien_do", "Biên độ dao động");
    let do_lech = ("do_lech", "Độ lệch");
    let dinh_day = ("khoang_cach_dinh_day", "Khoảng cách đỉnh / đáy");
    let thanh_khoan = ("thanh_khoan_volatility", "Thanh khoản");

    vec![
        range_sub(
            G,
            bien_do,
            "bien_do_dao_dong_phien",
            "Biên độ dao động trong phiên",
            "DailyRange",
            Scale::Percent,
            Some("%"),
            (0.0, 30.0),
        ),
        range_sub(
            G,
            bien_do,
            "bien_do_dao_dong_1_tuan",
            "Biên độ dao động 1 tuần",
            "WeeklyRange",
            Scale::Percent,
            Some("%"),
            (0.0, 50.0),
        ),
        range_sub(
            G,
            bien_do,
            "bien_do_dao_dong_1_thang",
            "Biên độ dao động 1 tháng",
            "MonthlyRange",
            Scale::Percent,
            Some("%"),
            (0.0, 100.0),
        ),
        range_sub(
            G,
            do_lech,
            "do_lech_chuan_20_phien",
            "Độ lệch chuẩn 20 phiên",
            "StdDev20",
            Scale::Percent,
            Some("%"),
            (0.0, 50.0),
        ),
        range_sub(
            G,
            do_lech,
            "atr_14_phien",
            "ATR 14 phiên",
            "ATR14",
            Scale::None,
            Some("VND"),
            (0.0, 10_000.0),
        ),
        range_sub(
            G,
            do_lech,
            "beta_volatility",
            "Beta",
            "Beta",
            Scale::None,
            None,
            (0.0, 3.0),
        ),
        range_sub(
            G,
            dinh_day,
            "khoang_cach_den_dinh_52_tuan",
            "Khoảng cách đến đỉnh 52 tuần",
            "GapToHigh52W",
            Scale::Percent,
            Some("%"),
            (0.0, 100.0),
        ),
        range_sub(
            G,
            dinh_day,
            "khoang_cach_den_day_52_tuan",
            "Khoảng cách đến đáy 52 tuần",
            "GapToLow52W",
            Scale::Percent,
            Some("%"),
            (0.0, 300.0),
        ),
        range_sub(
            G,
            thanh_khoan,
            "gia_tri_giao_dich_tb_20_phien",
            "GTGD trung bình 20 phiên",
            "AvgTradingValue20D",
            Scale::Billion,
            Some("Tỷ"),
            (0.0, 2_000.0),
        ),
        range_sub(
            G,
            thanh_khoan,
            "bien_dong_khoi_luong_20_phien",
            "Biến động khối lượng so với TB 20 phiên",
            "VolumeDeviation20D",
            Scale::Percent,
            Some("%"),
            (-100.0, 500.0),
        ),
    ]
}
