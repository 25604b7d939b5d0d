use anyhow::{Result, anyhow};

use nlcut::{interaction::{CoeffField, PotentialKind}, runtime::*};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    // Read buffer distance and maximum diameter from args
    let usage = "Usage: search_radius <r_buff> <d_max>";
    let r_buff: f64 = std::env::args().nth(1).ok_or(anyhow!(usage))?.parse()?;
    let d_max: f64 = std::env::args().nth(2).ok_or(anyhow!(usage))?.parse()?;

    let mut session = SessionBuilder::new()
        .with_types(&["small", "large"])
        .with_default_r_buff(r_buff)
        .build()?;
    session.create_pair_potential("slj", PotentialKind::Slj, PairPotentialDetails {
        r_cut: Some(1.12),
        d_max: Some(d_max),
        ..Default::default()
    })?;
    session.set_pair_coeff("slj", "small", "small", &[(CoeffField::Epsilon, 1.0), (CoeffField::Sigma, 1.0)])?;
    session.set_pair_coeff("slj", "small", "large", &[(CoeffField::Epsilon, 1.0), (CoeffField::Sigma, 1.0)])?;
    session.set_pair_coeff("slj", "large", "large", &[(CoeffField::Epsilon, 1.0), (CoeffField::Sigma, 1.0), (CoeffField::RCut, 2.5)])?;
    session.run(0)?;

    let nlist = session.get_global_neighbor_list()
        .ok_or(anyhow!("Global neighbor list was not created"))?;
    for (typ, name) in session.get_types().iter() {
        println!("{:>6}: r_cut max = {:.3}, ghost layer = {:.3}",
            name, nlist.get_type_rcut_max(typ), nlist.get_ghost_layer_width(typ));
    }
    println!("r_list in [{:.3}, {:.3}] ({} storage)", nlist.get_min_rlist(), nlist.get_max_rlist(), nlist.get_storage_mode());
    Ok(())
}
