//! Command implementations shared by the `lnormal` binary and tests

use crate::obj::load_obj;
use crate::slots::{FileSlots, default_slots_path};
use anyhow::{Context, Result, bail};
use normal_bake::{BakeSettings, PixelBuffer, write_png};
use normal_core::{
    ApplyOutcome, Axis, Direction, EditSettings, GeometryPort, MeshSnapshot, MirrorMap,
    MirrorMatcher, NormalStore, PickedAngle, PickerSession, RelaxNormals, clear_custom_normals,
    snap_angle, write_store_to_corners,
};
use std::path::{Path, PathBuf};

/// A loaded mesh with its persisted normal store
pub struct Workspace {
    pub mesh: MeshSnapshot,
    pub store: NormalStore,
    pub object_id: String,
    slots: FileSlots,
}

/// Object id derived from the mesh file stem
pub fn object_id_for(mesh_path: &Path) -> Result<String> {
    mesh_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive an object id from {:?}", mesh_path))
}

impl Workspace {
    /// Load `mesh_path` and the store for `object` (default: file stem) from
    /// `slots_path` (default: `<stem>.normals.json` next to the mesh)
    pub fn open(mesh_path: &Path, slots_path: Option<&Path>, object: Option<&str>) -> Result<Self> {
        let mesh = load_obj(mesh_path)?;
        let object_id = match object {
            Some(id) => id.to_string(),
            None => object_id_for(mesh_path)?,
        };
        let slots_path = slots_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_slots_path(mesh_path));
        let slots = FileSlots::open(slots_path);
        let store = NormalStore::load(&slots, &object_id);
        tracing::debug!(
            "Opened {:?} as '{}' ({} stored normals)",
            mesh_path,
            object_id,
            store.len()
        );

        Ok(Self {
            mesh,
            store,
            object_id,
            slots,
        })
    }

    /// Persist the store to the slots file
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&mut self.slots, &self.object_id);
        self.slots.save()
    }

    /// Slots file backing this workspace
    pub fn slots_path(&self) -> &Path {
        self.slots.path()
    }

    /// Select exactly `faces`
    pub fn select(&mut self, faces: &[usize]) -> Result<()> {
        if faces.is_empty() {
            bail!("No faces selected");
        }
        self.mesh.select_only(faces)?;
        Ok(())
    }
}

/// Bake the workspace store to a PNG at `output`
pub fn bake(ws: &Workspace, settings: &BakeSettings, output: &Path) -> Result<PixelBuffer> {
    settings.validate()?;
    let buffer = normal_bake::bake(&ws.mesh, &ws.store, settings)?;
    write_png(&buffer, output)?;
    Ok(buffer)
}

/// Default PNG path for a mesh, e.g. `robot.obj` -> `robot_normal.png`
pub fn default_output_path(mesh_path: &Path) -> PathBuf {
    let stem = mesh_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    mesh_path.with_file_name(format!("{stem}_normal.png"))
}

/// Set the direction given by `yaw_degrees`/`pitch_degrees` on `faces`,
/// mirrored per `settings`, and save the store
pub fn apply(
    ws: &mut Workspace,
    faces: &[usize],
    yaw_degrees: f32,
    pitch_degrees: f32,
    settings: &EditSettings,
) -> Result<ApplyOutcome> {
    settings.validate()?;
    ws.select(faces)?;

    let mut yaw = yaw_degrees.to_radians();
    let mut pitch = pitch_degrees.to_radians();
    if settings.use_snap {
        yaw = snap_angle(yaw, settings.snap_step_degrees);
        pitch = snap_angle(pitch, settings.snap_step_degrees);
    }
    let picked = PickedAngle {
        yaw,
        pitch,
        direction: Direction::from_spherical(yaw, pitch),
    };

    let mut session = PickerSession::begin(&ws.mesh, &ws.store, settings)?;
    let outcome = session.drag(&mut ws.mesh, &mut ws.store, picked, None)?;
    session.confirm();
    ws.save()?;
    Ok(outcome)
}

/// Mirror map for `faces` across `axis`
pub fn mirror(ws: &mut Workspace, faces: &[usize], axis: Axis, threshold: f32) -> Result<MirrorMap> {
    if !(threshold > 0.0) {
        bail!("Mirror threshold must be positive, got {}", threshold);
    }
    ws.select(faces)?;
    let corners = ws.mesh.selected_corners();
    Ok(MirrorMatcher { axis, threshold }.find(&ws.mesh, &corners))
}

/// Relax the stored normals, write them to the corners and save the store
pub fn relax(ws: &mut Workspace, relax: RelaxNormals) -> Result<()> {
    let relaxed = relax.apply(&ws.mesh, &ws.store)?;
    ws.store = relaxed;
    write_store_to_corners(&mut ws.mesh, &ws.store)?;
    ws.save()?;
    tracing::info!("Normals smoothed ({} polygons)", ws.store.len());
    Ok(())
}

/// Reset corner normals and empty the saved store
pub fn clear(ws: &mut Workspace) -> Result<()> {
    clear_custom_normals(&mut ws.mesh, &mut ws.store)?;
    ws.save()
}

/// Stored directions of polygons that exist in the mesh
pub fn stored_normals(ws: &Workspace) -> Vec<(usize, Direction)> {
    ws.store.iter_valid(ws.mesh.polygon_count()).collect()
}
