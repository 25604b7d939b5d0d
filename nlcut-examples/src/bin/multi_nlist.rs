use anyhow::Result;
use log::info;

use nlcut::{interaction::{CoeffField, PotentialKind}, neighbor::NeighborListDetails, runtime::*};

const TYPES: &[&str] = &["A", "B"];

fn print_table(session: &Session, nlist: &str) -> Result<()> {
    println!("Neighbor list {}:", nlist);
    for (i, type_a) in TYPES.iter().enumerate() {
        for type_b in &TYPES[i..] {
            println!("  r_cut({},{}) = {}", type_a, type_b, session.get_pair_rcut(nlist, type_a, type_b)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let mut session = SessionBuilder::new()
        .with_types(TYPES)
        .build()?;
    // Explicit cell list for LJ, Gaussian goes to the global list
    session.create_neighbor_list("cell", NeighborListDetails::default())?;
    session.create_pair_potential("lj", PotentialKind::Lj, PairPotentialDetails {
        r_cut: Some(2.5),
        nlist: Some("cell".into()),
        ..Default::default()
    })?;
    session.create_pair_potential("gauss", PotentialKind::Gauss, PairPotentialDetails {
        r_cut: Some(1.0),
        ..Default::default()
    })?;
    let lj_rcuts = [("A", "A", Some(3.0)), ("A", "B", None), ("B", "B", Some(3.1))];
    for (type_a, type_b, r_cut) in lj_rcuts {
        session.set_pair_coeff("lj", type_a, type_b, &[(CoeffField::Epsilon, 1.0), (CoeffField::Sigma, 1.0)])?;
        if let Some(r_cut) = r_cut {
            session.set_pair_coeff("lj", type_a, type_b, &[(CoeffField::RCut, r_cut)])?;
        }
    }
    for (type_a, type_b, r_cut) in [("A", "A", 1.0), ("A", "B", 2.0), ("B", "B", 5.1)] {
        session.set_pair_coeff_by_name("gauss", type_a, type_b, &[("epsilon", 1.0), ("sigma", 1.0), ("r_cut", r_cut)])?;
    }

    session.run(1)?;
    print_table(&session, "cell")?;
    print_table(&session, GLOBAL_NLIST_NAME)?;

    // An SLJ potential on the cell list overrides (B,B) there
    session.create_pair_potential("slj", PotentialKind::Slj, PairPotentialDetails {
        r_cut: Some(1.0),
        nlist: Some("cell".into()),
        d_max: Some(1.2),
    })?;
    for (type_a, type_b, r_cut) in [("A", "A", 1.0), ("A", "B", 2.0), ("B", "B", 5.1)] {
        session.set_pair_coeff("slj", type_a, type_b, &[(CoeffField::Epsilon, 1.0), (CoeffField::Sigma, 1.0), (CoeffField::RCut, r_cut)])?;
    }
    session.run(1)?;
    print_table(&session, "cell")?;

    let cell = session.get_neighbor_list("cell")?;
    info!("Cell list search radius in [{}, {}]", cell.get_min_rlist(), cell.get_max_rlist());
    Ok(())
}
