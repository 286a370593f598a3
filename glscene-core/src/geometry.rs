/// Geometry primitives and mesh generators
use nalgebra::{Point2, Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding of the triangle's positions
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.vertices.map(|v| v.position);
        (v1 - v0).cross(&(v2 - v0)).normalize()
    }

    /// Mean of the three vertex normals, used for smooth shading
    pub fn average_normal(&self) -> Vector3<f32> {
        let sum: Vector3<f32> = self.vertices.iter().map(|v| v.normal).sum();
        sum.try_normalize(f32::EPSILON).unwrap_or_else(|| self.calculate_normal())
    }
}

/// Triangle soup consumed by rasterizers
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }
}

/// Indexed mesh with per-vertex positions, texture coordinates and normals.
///
/// `indices` holds triangles as consecutive triples into the vertex arrays.
#[derive(Debug, Clone, Default)]
pub struct PolygonMesh {
    pub points: Vec<Point3<f32>>,
    pub uvs: Vec<Point2<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
}

impl PolygonMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate zeroed storage for `point_count` vertices and `index_count` indices.
    pub fn create(point_count: usize, index_count: usize) -> Self {
        Self {
            points: vec![Point3::origin(); point_count],
            uvs: vec![Point2::origin(); point_count],
            normals: vec![Vector3::zeros(); point_count],
            indices: vec![0; index_count],
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn set_point(&mut self, index: usize, point: Point3<f32>) {
        self.points[index] = point;
    }

    pub fn set_uv(&mut self, index: usize, uv: Point2<f32>) {
        self.uvs[index] = uv;
    }

    /// Recompute vertex normals by accumulating the (area weighted) normal
    /// of every face touching a vertex and normalizing the sum.
    pub fn create_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.points.len()];

        for face in self.indices.chunks_exact(3) {
            let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
            let face_normal = (self.points[b] - self.points[a]).cross(&(self.points[c] - self.points[a]));
            normals[a] += face_normal;
            normals[b] += face_normal;
            normals[c] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        }

        self.normals = normals;
    }

    /// Flatten into a triangle soup carrying the vertex normals.
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.triangle_count());
        let vertex = |i: u32| Vertex::new(self.points[i as usize], self.normals[i as usize]);

        for face in self.indices.chunks_exact(3) {
            mesh.add_triangle(Triangle::new(vertex(face[0]), vertex(face[1]), vertex(face[2])));
        }

        mesh
    }
}

/// Build an open cylinder around the Z axis, centred at the origin.
///
/// Vertices come in top/bottom pairs (`z = height / 2` and `z = -height / 2`).
/// An odd `point_count` is rounded up. The last pair duplicates the first so
/// the texture seam has its own UVs; their normals are averaged so the seam
/// shades smoothly.
pub fn cylinder(point_count: usize, radius: f32, height: f32) -> PolygonMesh {
    let half_height = height * 0.5;
    let n = point_count + point_count % 2;

    let mut mesh = PolygonMesh::create(n, n.saturating_sub(2) * 3);
    let span = n as f32 - 2.0;

    for i in (0..n).step_by(2) {
        let t = if span > 0.0 { i as f32 / span } else { 0.0 };
        let angle = t * std::f32::consts::TAU;
        let (x, y) = (angle.cos() * radius, angle.sin() * radius);

        mesh.set_point(i, Point3::new(x, y, half_height));
        mesh.set_point(i + 1, Point3::new(x, y, -half_height));
        mesh.set_uv(i, Point2::new(t, 1.0));
        mesh.set_uv(i + 1, Point2::new(t, 0.0));

        if i + 2 < n {
            let base = i * 3;
            let i = i as u32;
            mesh.indices[base..base + 6].copy_from_slice(&[i, i + 1, i + 3, i + 3, i + 2, i]);
        }
    }

    mesh.create_normals();

    if n > 2 {
        for (seam, start) in [(n - 2, 0), (n - 1, 1)] {
            let averaged = (mesh.normals[start] + mesh.normals[seam]) * 0.5;
            mesh.normals[start] = averaged;
            mesh.normals[seam] = averaged;
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cylinder_counts() {
        let mesh = cylinder(32, 1.0, 2.0);
        assert_eq!(mesh.point_count(), 32);
        assert_eq!(mesh.indices.len(), 30 * 3);
        assert_eq!(mesh.triangle_count(), 30);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.point_count()));
    }

    #[test]
    fn test_odd_point_count_rounds_up() {
        let mesh = cylinder(7, 1.0, 1.0);
        assert_eq!(mesh.point_count(), 8);
        assert_eq!(mesh.indices.len(), 18);
    }

    #[test]
    fn test_cylinder_points_lie_on_caps() {
        let mesh = cylinder(16, 2.0, 3.0);
        for (i, p) in mesh.points.iter().enumerate() {
            assert_relative_eq!((p.x * p.x + p.y * p.y).sqrt(), 2.0, epsilon = 1e-5);
            let expected_z = if i % 2 == 0 { 1.5 } else { -1.5 };
            assert_eq!(p.z, expected_z);
        }
        // the final pair closes the loop on top of the first
        assert_relative_eq!(mesh.points[14], mesh.points[0], epsilon = 1e-5);
    }

    #[test]
    fn test_cylinder_uvs() {
        let mesh = cylinder(10, 1.0, 1.0);
        assert_eq!(mesh.uvs[0], Point2::new(0.0, 1.0));
        assert_eq!(mesh.uvs[1], Point2::new(0.0, 0.0));
        assert_eq!(mesh.uvs[8], Point2::new(1.0, 1.0));
        assert_eq!(mesh.uvs[4], Point2::new(0.5, 1.0));
    }

    #[test]
    fn test_cylinder_first_quad_indices() {
        let mesh = cylinder(8, 1.0, 1.0);
        assert_eq!(&mesh.indices[0..6], &[0, 1, 3, 3, 2, 0]);
        assert_eq!(&mesh.indices[12..18], &[4, 5, 7, 7, 6, 4]);
    }

    #[test]
    fn test_seam_normals_are_shared() {
        let mesh = cylinder(24, 1.0, 2.0);
        assert_eq!(mesh.normals[0], mesh.normals[22]);
        assert_eq!(mesh.normals[1], mesh.normals[23]);
        // the seam sits at angle 0, so its normal points along +X
        assert!(mesh.normals[0].x > 0.9);
        assert_relative_eq!(mesh.normals[0].y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(mesh.normals[0].z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_side_normals_point_outward() {
        let mesh = cylinder(24, 1.0, 2.0);
        for (p, n) in mesh.points.iter().zip(&mesh.normals).skip(2).take(18) {
            let radial = Vector3::new(p.x, p.y, 0.0).normalize();
            assert!(n.dot(&radial) > 0.95);
        }
    }

    #[test]
    fn test_to_mesh_flattens_indices() {
        let polygon = cylinder(12, 1.0, 1.0);
        let mesh = polygon.to_mesh();
        assert_eq!(mesh.triangles.len(), polygon.triangle_count());
        assert_eq!(mesh.triangles[0].vertices[2].position, polygon.points[3]);
    }

    #[test]
    fn test_degenerate_cylinder_has_no_faces() {
        let mesh = cylinder(2, 1.0, 1.0);
        assert_eq!(mesh.point_count(), 2);
        assert!(mesh.indices.is_empty());
    }
}
