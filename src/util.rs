use std::ops::Range;

use crate::types::CellGid;

/// Number of draws for a given proportion of a pool. Ties round to even.
pub fn in_degree(proportion: f64, pool_size: usize) -> usize {
    (proportion * pool_size as f64).round_ties_even() as usize
}

/// Contiguous block of `cluster_size` gids containing `gid`. The block may
/// extend past the end of the population.
pub fn cluster_range(gid: CellGid, cluster_size: usize) -> Range<CellGid> {
    let start = gid / cluster_size * cluster_size;
    Range {
        start,
        end: start + cluster_size,
    }
}

/// Draws an index uniformly from `range` with `excluded` taken out, by
/// sampling from one fewer slot and shifting past the excluded value.
/// `excluded` must lie inside `range`.
pub fn shift_past_excluded(drawn: usize, excluded: usize) -> usize {
    if drawn >= excluded {
        drawn + 1
    } else {
        drawn
    }
}

#[cfg(test)]
pub mod test_util {
    use float_cmp::{assert_approx_eq, ApproxEq};
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::fmt::Debug;
    use std::sync::{Mutex, Once};

    use crate::params::{BrunelParams, IoNetworkParams};

    pub fn assert_approx_eq_slice<T>(left: &[T], right: &[T])
    where
        T: ApproxEq + Debug + Copy,
    {
        assert_eq!(left.len(), right.len());

        for item in left.iter().zip(right) {
            assert_approx_eq!(T, *item.0, *item.1);
        }
    }

    struct RecordingLogger {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl Log for RecordingLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static LOGGER: RecordingLogger = RecordingLogger {
        records: Mutex::new(Vec::new()),
    };
    static LOGGER_INIT: Once = Once::new();

    /// Installs a process-wide logger that keeps every record. Records from
    /// concurrently running tests end up in the same list.
    pub fn record_logs() {
        LOGGER_INIT.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(LevelFilter::Trace);
        });
    }

    pub fn was_logged(level: Level, message: &str) -> bool {
        LOGGER
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|(logged_level, logged)| *logged_level == level && logged == message)
    }

    pub fn get_template_brunel_params() -> BrunelParams {
        BrunelParams {
            nexc: 400,
            ninh: 100,
            next: 40,
            in_degree_prop: 0.05,
            weight: 1.2,
            delay: 0.1,
            rel_inh_strength: 1.0,
            poiss_lambda: 1.0,
            seed: 42,
        }
    }

    pub fn get_template_io_network_params() -> IoNetworkParams {
        IoNetworkParams {
            ncells: 16,
            cluster_size: 4,
            dend_count: 10,
            bridge_fraction: 0.1,
            junctions_per_cell: 5..10,
            conductance: 0.05,
            seed: 0,
        }
    }
}
